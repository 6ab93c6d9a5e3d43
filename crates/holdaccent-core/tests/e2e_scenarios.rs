// Holdaccent End-to-End Test Scenarios
//
// These tests replay complete typing sessions through the host session:
// scripted key events, focus changes, reloads and timer firings, checked
// against what the application would finally receive.
//
// Run with: cargo test -p holdaccent-core --test e2e_scenarios

mod e2e_tests {
    use std::fs;
    use std::time::Instant;

    use holdaccent_core::{
        Action, Config, ConfigError, Key, LeaderKey, MappingSlot, Output, Script, ScriptError,
        Session, Transcript,
    };

    // =========================================================================
    // Test Helpers
    // =========================================================================

    fn run(config: &Config, script: &str) -> Transcript {
        let script = Script::parse(script).unwrap();
        let mut session = Session::with_origin(config, Transcript::new(), Instant::now());
        session.run_script(&script).unwrap();
        session.into_sink()
    }

    fn commit(context: &str, text: &str) -> Output {
        Output::Commit {
            context: context.to_string(),
            text: text.to_string(),
        }
    }

    fn forward(context: &str, key: Key, action: Action, text: Option<char>) -> Output {
        Output::Forward {
            context: context.to_string(),
            key,
            action,
            text,
        }
    }

    // =========================================================================
    // Scenario 1: Typing words with umlauts
    // =========================================================================

    #[test]
    fn test_scenario_type_word_with_umlaut() {
        let transcript = run(
            &Config::default(),
            "0   tap h\n\
             100 press a\n\
             150 press space\n\
             180 release space\n\
             200 release a\n\
             300 tap l\n\
             400 tap l\n\
             500 press o\n\
             550 release o\n",
        );

        assert_eq!(transcript.typed_text(), "hällo");
        assert_eq!(transcript.commits(), vec!["ä", "o"]);
    }

    #[test]
    fn test_scenario_uppercase_needs_longer_window() {
        let transcript = run(
            &Config::default(),
            "0   press U\n\
             600 press space\n\
             650 release U\n\
             1000 press u\n\
             1600 press space\n",
        );

        // 'U' confirmed at 600 ms (700 ms window), 'u' timed out at 1400 ms
        assert_eq!(transcript.typed_text(), "Üu ");
        assert_eq!(transcript.commits(), vec!["Ü", "u"]);
    }

    // =========================================================================
    // Scenario 2: Timeouts
    // =========================================================================

    #[test]
    fn test_scenario_timeout_then_other_key() {
        let transcript = run(&Config::default(), "0 press a\n450 press b\n");

        assert_eq!(
            transcript.outputs(),
            &[
                commit("default", "a"),
                forward("default", Key::from(48), Action::Press, Some('b')),
            ]
        );
    }

    #[test]
    fn test_scenario_leader_at_deadline_loses_to_timer() {
        let transcript = run(&Config::default(), "0 press a\n400 press space\n");

        assert_eq!(transcript.commits(), vec!["a"]);
        assert_eq!(transcript.typed_text(), "a ");
    }

    #[test]
    fn test_scenario_trailing_pending_key_is_drained() {
        let transcript = run(&Config::default(), "0 press s\n");
        assert_eq!(transcript.outputs(), &[commit("default", "s")]);
    }

    #[test]
    fn test_scenario_key_repeat_keeps_first_deadline() {
        let transcript = run(
            &Config::default(),
            "0   press o\n\
             150 repeat o\n\
             300 repeat o\n\
             399 repeat o\n\
             420 press space\n",
        );

        assert_eq!(transcript.commits(), vec!["o"]);
        assert_eq!(transcript.typed_text(), "o ");
    }

    // =========================================================================
    // Scenario 3: Leader variants
    // =========================================================================

    #[test]
    fn test_scenario_arrow_leaders() {
        let mut config = Config::default();
        config.leader_key = LeaderKey::LeftOrRight;

        let transcript = run(
            &config,
            "0    press o\n\
             100  press left\n\
             150  release left\n\
             200  release o\n\
             1000 press u\n\
             1100 press right\n",
        );

        assert_eq!(transcript.commits(), vec!["ö", "ü"]);
        assert_eq!(transcript.typed_text(), "öü");
    }

    #[test]
    fn test_scenario_all_leader_accepts_space_and_arrows() {
        let mut config = Config::default();
        config.leader_key = LeaderKey::All;

        let transcript = run(
            &config,
            "0   press a\n\
             50  press space\n\
             500 press o\n\
             550 press left\n\
             900 press u\n\
             950 press right\n",
        );

        assert_eq!(transcript.commits(), vec!["ä", "ö", "ü"]);
    }

    // =========================================================================
    // Scenario 4: Focus and enable/disable
    // =========================================================================

    #[test]
    fn test_scenario_focus_change_drops_pending_key() {
        let transcript = run(
            &Config::default(),
            "0    press u\n\
             100  focus editor\n\
             1000 wait\n\
             1100 tap x\n",
        );

        assert!(transcript.commits().is_empty());
        assert_eq!(transcript.typed_text_in("editor"), "x");
        assert_eq!(transcript.typed_text_in("default"), "");
    }

    #[test]
    fn test_scenario_commits_follow_focus() {
        let transcript = run(
            &Config::default(),
            "0   focus chat\n\
             10  press a\n\
             50  press space\n\
             100 focus mail\n\
             110 press o\n",
        );

        assert_eq!(
            transcript.outputs(),
            &[commit("chat", "ä"), commit("mail", "o")]
        );
    }

    #[test]
    fn test_scenario_disable_passes_everything() {
        let transcript = run(
            &Config::default(),
            "0   press a\n\
             100 disable\n\
             200 press a\n\
             300 release a\n\
             400 enable\n\
             500 press a\n\
             600 press space\n",
        );

        assert_eq!(transcript.commits(), vec!["ä"]);
        assert_eq!(transcript.typed_text(), "aä");
    }

    // =========================================================================
    // Scenario 5: Configuration files
    // =========================================================================

    #[test]
    fn test_scenario_reload_mid_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("french.toml");
        fs::write(
            &path,
            "LeaderKey = \"LeftArrow\"\n\
             DelayLowercase = 600\n\
             Mapping1Input = \"e\"\n\
             Mapping1Output = \"é\"\n",
        )
        .unwrap();

        let script = format!(
            "0   press a\n\
             100 reload {}\n\
             200 press left\n\
             1000 press e\n\
             1500 press left\n",
            path.display()
        );
        let transcript = run(&Config::default(), &script);

        // The pending 'a' keeps its substitute; 'e' uses the new table
        assert_eq!(transcript.commits(), vec!["ä", "é"]);
    }

    #[test]
    fn test_scenario_reload_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let script = Script::parse(&format!(
            "0 reload {}\n",
            dir.path().join("missing.toml").display()
        ))
        .unwrap();

        let mut session = Session::new(&Config::default(), Transcript::new());
        let err = session.run_script(&script).unwrap_err();
        assert!(matches!(err, ScriptError::Config(ConfigError::Io(_))));
    }

    #[test]
    fn test_scenario_script_file_with_bad_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        fs::write(&path, "0 press a\n# note\n100 squeeze a\n").unwrap();

        match Script::from_path(&path) {
            Err(ScriptError::Parse { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_config_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::with_mappings(vec![
            MappingSlot::new("a", "à"),
            MappingSlot::new("\"", "„"),
        ]);
        config.leader_key = LeaderKey::SpaceOrRight;
        config.delay_lowercase_ms = 325;
        config.save(&path).unwrap();

        let loaded = Config::from_toml_path(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.mapping_table().get("\""), Some("„"));
    }

    #[test]
    fn test_malformed_config_is_sanitized() {
        let config = Config::from_toml(
            "DelayLowercase = 10\n\
             DelayUppercase = 5000\n\
             LeaderKey = \"Diagonal\"\n\
             Mapping1Input = \"\"\n\
             Mapping1Output = \"x\"\n\
             Mapping21Input = \"z\"\n\
             Mapping21Output = \"ž\"\n",
        )
        .unwrap();

        assert_eq!(config.leader_key, LeaderKey::Space);
        assert_eq!(config.timeouts().lowercase().as_millis(), 50);
        assert_eq!(config.timeouts().uppercase().as_millis(), 2000);

        let table = config.mapping_table();
        assert!(!table.contains("a"));
        assert!(!table.contains("z"));
        assert_eq!(table.get("o"), Some("ö"));
    }
}
