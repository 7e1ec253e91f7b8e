//! Plugin actions driven through the headless host.

mod common;

use common::fixtures::{config_with_formatters, Fixture};
use ggu::app::headless::HeadlessHost;
use ggu::app::{Action, ActionOutcome, MessageTab, PluginState, Severity};
use ggu::config::PluginConfig;
use ggu::model::document::Document;
use ggu::model::filetype::FileType;
use ggu::services::filter::FilterError;

const NOISY_JSON: &str = r#"  noise {"a":1} trailing"#;

fn json_document() -> Document {
    Document::with_path(NOISY_JSON, "/nowhere/data.txt")
}

#[test]
#[cfg_attr(not(unix), ignore = "Shell commands require Unix-like environment")]
fn test_json_pretty_replaces_trimmed_text_as_one_undo_step() {
    let mut fx = Fixture::new(config_with_formatters("cat", "cat"), json_document());
    fx.document_mut().set_cursor(10);

    let outcome = fx.state.activate(Action::JsonPretty, &mut fx.host);
    assert!(matches!(outcome, ActionOutcome::Applied), "{outcome:?}");

    assert_eq!(fx.document().text(), r#"{"a":1}"#);
    assert_eq!(fx.document().cursor(), 0);
    assert_eq!(fx.document().filetype(), FileType::Json);
    assert!(
        fx.host.status.iter().any(|s| s.contains("8..15")),
        "{:?}",
        fx.host.status
    );
    assert!(fx.leftover_files().is_empty());

    assert!(fx.document_mut().undo());
    assert_eq!(fx.document().text(), NOISY_JSON);
    assert!(!fx.document().can_undo());
}

#[test]
#[cfg_attr(not(unix), ignore = "Shell commands require Unix-like environment")]
fn test_xml_pretty_keeps_filetype() {
    let doc = Document::with_path("<?xml?>\n<a><b/></a>\n", "/nowhere/page.html");
    let mut fx = Fixture::new(config_with_formatters("cat", "cat"), doc);

    let outcome = fx.state.activate(Action::XmlPretty, &mut fx.host);
    assert!(outcome.is_success());
    assert_eq!(fx.document().text(), "<?xml?>\n<a><b/></a>");
    assert_eq!(fx.document().filetype(), FileType::Html);
}

#[test]
#[cfg_attr(not(unix), ignore = "Shell commands require Unix-like environment")]
fn test_format_failure_leaves_document_and_reports() {
    let config = config_with_formatters("sh -c 'echo oops >&2; exit 1'", "cat");
    let mut fx = Fixture::new(config, json_document());

    let outcome = fx.state.activate(Action::JsonPretty, &mut fx.host);
    match outcome {
        ActionOutcome::Failed(FilterError::Format { exit_code, .. }) => {
            assert_eq!(exit_code, Some(1))
        }
        other => panic!("expected format failure, got {other:?}"),
    }

    assert_eq!(fx.document().text(), NOISY_JSON);
    assert!(!fx.document().is_modified());
    assert!(!fx.document().can_undo());
    assert_eq!(fx.document().filetype(), FileType::Text);
    assert_eq!(fx.host.message_tab, Some(MessageTab::Messages));

    let errors: Vec<_> = fx.host.errors().collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].document.as_deref(), Some("data.txt"));
    assert!(errors[0].text.contains("exit code 1"), "{}", errors[0].text);
    assert!(errors[0].text.contains("valid JSON"), "{}", errors[0].text);
    assert!(fx.leftover_files().is_empty());
}

#[test]
fn test_missing_formatter_names_package() {
    let config = config_with_formatters("cat", "ggu-test-no-such-tidy -q");
    let doc = Document::with_path("<a/>", "/nowhere/page.xml");
    let mut fx = Fixture::new(config, doc);

    let outcome = fx.state.activate(Action::XmlPretty, &mut fx.host);
    assert!(matches!(
        outcome,
        ActionOutcome::Failed(FilterError::ToolMissing { .. })
    ));
    assert_eq!(fx.document().text(), "<a/>");

    let errors: Vec<_> = fx.host.errors().collect();
    assert_eq!(errors.len(), 1);
    assert!(
        errors[0].text.starts_with("[page.xml]"),
        "{}",
        errors[0].text
    );
    assert!(
        errors[0].text.contains("package ggu-test-no-such-tidy"),
        "{}",
        errors[0].text
    );
}

#[test]
#[cfg_attr(not(unix), ignore = "Shell commands require Unix-like environment")]
fn test_pipe_applies_shell_command() {
    let mut fx = Fixture::new(PluginConfig::default(), Document::new("banana\napple\n"));
    fx.host.prompt_answer = Some("sort".to_string());

    let outcome = fx.state.activate_keybinding("ggu_pipe", &mut fx.host);
    assert!(matches!(outcome, Some(ActionOutcome::Applied)));
    assert_eq!(fx.document().text(), "apple\nbanana\n");
    assert_eq!(fx.host.prompts.len(), 1);

    assert!(fx.document_mut().undo());
    assert_eq!(fx.document().text(), "banana\napple\n");
    assert!(fx.document_mut().redo());
    assert_eq!(fx.document().text(), "apple\nbanana\n");
}

#[test]
fn test_pipe_cancel_has_no_side_effects() {
    for answer in [None, Some("   ".to_string())] {
        let mut fx = Fixture::new(PluginConfig::default(), Document::new("keep me"));
        fx.host.prompt_answer = answer;

        let outcome = fx.state.activate(Action::Pipe, &mut fx.host);
        assert!(matches!(outcome, ActionOutcome::Cancelled));
        assert_eq!(fx.document().text(), "keep me");
        assert!(!fx.document().can_undo());
        assert!(fx.host.messages.is_empty());
        assert!(fx.leftover_files().is_empty());
    }
}

#[test]
#[cfg_attr(not(unix), ignore = "Shell commands require Unix-like environment")]
fn test_pipe_failure_message_includes_output() {
    let mut fx = Fixture::new(PluginConfig::default(), Document::new("x"));
    fx.host.prompt_answer = Some("echo nope >&2; exit 2".to_string());

    let outcome = fx.state.activate(Action::Pipe, &mut fx.host);
    assert!(matches!(outcome, ActionOutcome::Failed(_)));
    assert_eq!(fx.document().text(), "x");

    let errors: Vec<_> = fx.host.errors().collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].text.contains('2'), "{}", errors[0].text);
    assert!(errors[0].text.contains("nope"), "{}", errors[0].text);
    assert_eq!(errors[0].severity, Severity::Error);
}

#[test]
fn test_actions_without_document() {
    let mut host = HeadlessHost::default();
    let mut state = PluginState::load(PluginConfig::default(), None, &mut host);

    for action in [Action::JsonPretty, Action::XmlPretty, Action::Pipe] {
        assert!(matches!(
            state.activate(action, &mut host),
            ActionOutcome::NoDocument
        ));
    }
    assert!(host.prompts.is_empty());
}

#[test]
fn test_favourites_menu_opens_scratch_entry() {
    let dir = tempfile::TempDir::new().unwrap();
    let home = dir.path().join("home");
    std::fs::create_dir_all(&home).unwrap();
    std::fs::write(home.join("notes.md"), "# notes").unwrap();
    let scratch = dir.path().join("scratch");

    let config = PluginConfig {
        favourites: format!(
            "Notes;$HOME/notes.md;---;Scratch;{}/todo.txt;Gone;$HOME/gone.txt",
            scratch.display()
        ),
        scratch_prefix: scratch.clone(),
        ..Default::default()
    };
    let mut host = HeadlessHost::default();
    let mut state = PluginState::load(config, Some(&home), &mut host);

    assert!(state.activate(Action::Favourites, &mut host).is_success());
    let menu = host.last_favourites_menu.clone().unwrap();
    let paths: Vec<_> = menu.paths().map(|p| p.to_path_buf()).collect();
    assert_eq!(paths, vec![home.join("notes.md"), scratch.join("todo.txt")]);

    state.open_favourite(&paths[1], &mut host).unwrap();
    assert!(scratch.join("todo.txt").is_file());
    assert_eq!(host.document.as_ref().map(|d| d.text()), Some(""));

    state.open_favourite(&paths[0], &mut host).unwrap();
    assert_eq!(host.document.as_ref().map(|d| d.text()), Some("# notes"));
    state.unload();
}
