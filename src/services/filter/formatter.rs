//! Built-in formatter definitions (JSON and XML/HTML pretty printing).

use super::trim::TrimStrategy;
use super::FilterCommand;
use rust_i18n::t;
use serde::Serialize;

/// An external pretty printer invoked through an argument vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Formatter {
    /// Translated action label shown in messages, e.g. "JSON pretty"
    pub label: String,
    /// Content kind named in "not valid ..." messages
    pub kind: String,
    /// Program followed by its arguments
    pub argv: Vec<String>,
    /// Package providing the program, reported when it is missing
    pub package: String,
    /// Suffix for the scratch files
    pub suffix: String,
    pub trim: TrimStrategy,
}

/// Ruby one-liner: parse the (stripped) input and pretty-generate it
const RUBY_JSON_PRETTY: &str = "puts JSON.pretty_generate(JSON.parse(ARGF.read.strip))";

pub fn json_default() -> Formatter {
    Formatter {
        label: t!("formatter.json_label").to_string(),
        kind: t!("formatter.json_kind").to_string(),
        argv: vec![
            "ruby".to_string(),
            "-rjson".to_string(),
            "-e".to_string(),
            RUBY_JSON_PRETTY.to_string(),
        ],
        package: "ruby".to_string(),
        suffix: ".json".to_string(),
        trim: TrimStrategy::Json,
    }
}

pub fn xml_default() -> Formatter {
    let argv = [
        "tidy",
        "-q",
        "-xml",
        "-w",
        "105",
        "--indent",
        "auto",
        "--indent-spaces",
        "2",
        "--indent-attributes",
        "y",
        "--quiet",
        "yes",
    ];
    Formatter {
        label: t!("formatter.xml_label").to_string(),
        kind: t!("formatter.xml_kind").to_string(),
        argv: argv.iter().map(|s| s.to_string()).collect(),
        package: "tidy".to_string(),
        suffix: ".xml".to_string(),
        trim: TrimStrategy::Xml,
    }
}

impl Formatter {
    pub fn program(&self) -> Option<&str> {
        self.argv.first().map(String::as_str)
    }

    pub fn args(&self) -> &[String] {
        self.argv.get(1..).unwrap_or_default()
    }

    /// Replace the command line, keeping label, kind, suffix and trimming.
    ///
    /// `command` is split with shell-word rules but never run through a
    /// shell. Without an explicit `package` the program name is used.
    pub fn with_command(&self, command: &str, package: Option<String>) -> Result<Self, String> {
        let argv = shell_words::split(command)
            .map_err(|e| format!("Failed to parse formatter command: {}", e))?;
        let Some(program) = argv.first() else {
            return Err("Formatter command is empty".to_string());
        };
        let package = package
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| program.clone());

        Ok(Self {
            argv,
            package,
            ..self.clone()
        })
    }

    pub fn command(&self) -> FilterCommand {
        FilterCommand::Program {
            argv: self.argv.clone(),
            package: self.package.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_default() {
        let f = json_default();
        assert_eq!(f.program(), Some("ruby"));
        assert_eq!(f.args().len(), 3);
        assert_eq!(f.trim, TrimStrategy::Json);
        assert_eq!(f.suffix, ".json");
    }

    #[test]
    fn test_xml_default() {
        let f = xml_default();
        assert_eq!(f.program(), Some("tidy"));
        assert!(f.args().iter().any(|a| a == "-xml"));
        assert_eq!(f.trim, TrimStrategy::Xml);
        assert_eq!(f.package, "tidy");
    }

    #[test]
    fn test_labels_are_translated() {
        assert_eq!(json_default().label, t!("formatter.json_label"));
        assert_eq!(xml_default().kind, t!("formatter.xml_kind"));
        assert_eq!(
            t!("formatter.json_label", locale = "de"),
            "JSON formatieren"
        );
        assert_eq!(
            t!("formatter.xml_label", locale = "de"),
            "XML/HTML formatieren"
        );
    }

    #[test]
    fn test_with_command_keeps_quoted_argument_whole() {
        let f = json_default()
            .with_command(r#"python3 -c "import json,sys; print(1)""#, None)
            .unwrap();
        assert_eq!(f.argv, ["python3", "-c", "import json,sys; print(1)"]);
        assert_eq!(f.package, "python3");
        assert_eq!(f.label, "JSON pretty");
    }

    #[test]
    fn test_with_command_blank_package_falls_back() {
        let f = xml_default()
            .with_command("xmllint --format -", Some(" ".to_string()))
            .unwrap();
        assert_eq!(f.package, "xmllint");
    }

    #[test]
    fn test_with_command_rejects_empty() {
        assert!(json_default().with_command("", None).is_err());
    }

    #[test]
    fn test_command_is_argument_vector() {
        match xml_default().command() {
            FilterCommand::Program { argv, package } => {
                assert_eq!(argv[0], "tidy");
                assert_eq!(package, "tidy");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
