//! JSON pretty, XML/HTML pretty and pipe actions.
//!
//! Each action reads the current document, runs it through the filter
//! pipeline and, only when the output was read completely, replaces the
//! document text as one undoable edit.

use super::{ActionOutcome, Host, MessageTab, PluginState, Severity};
use crate::model::filetype::FileType;
use crate::services::filter::formatter::Formatter;
use crate::services::filter::trim;
use crate::services::filter::{run_filter, FilterError, FilterRequest};
use rust_i18n::t;

impl PluginState {
    pub(super) fn exec_json_pretty(&self, host: &mut dyn Host) -> ActionOutcome {
        let formatter = self.config.json_formatter.clone();
        self.exec_formatter(&formatter, Some(FileType::Json), host)
    }

    pub(super) fn exec_xml_pretty(&self, host: &mut dyn Host) -> ActionOutcome {
        let formatter = self.config.xml_formatter.clone();
        self.exec_formatter(&formatter, None, host)
    }

    /// Run a fixed formatter on the whole document (after trimming).
    fn exec_formatter(
        &self,
        formatter: &Formatter,
        filetype_after: Option<FileType>,
        host: &mut dyn Host,
    ) -> ActionOutcome {
        let Some(doc) = host.current_document() else {
            return ActionOutcome::NoDocument;
        };
        let text = doc.text().to_string();
        let name = doc.display_name();

        let range = trim::find_range(&text, formatter.trim);
        host.status_add(&t!(
            "filter.offsets",
            label = &formatter.label,
            begin = range.begin,
            end = range.end,
            len = text.len()
        ));

        let result = run_filter(&self.scoped(FilterRequest::for_formatter(&text, formatter)));
        match result {
            Ok(output) => {
                self.apply_output(host, &output.text, &formatter.label);
                if let Some(filetype) = filetype_after {
                    if let Some(doc) = host.current_document() {
                        doc.set_filetype(filetype);
                    }
                }
                ActionOutcome::Applied
            }
            Err(FilterError::Cancelled) => ActionOutcome::Cancelled,
            Err(e) => {
                let message = formatter_error_message(formatter, &name, &e);
                report_error(host, &name, &message);
                ActionOutcome::Failed(e)
            }
        }
    }

    /// Prompt for a shell fragment and pipe the whole document through it.
    pub(super) fn exec_pipe(&self, host: &mut dyn Host) -> ActionOutcome {
        if host.current_document().is_none() {
            return ActionOutcome::NoDocument;
        }

        let title = t!("pipe.prompt_title");
        let label = t!("pipe.prompt_label");
        let Some(fragment) = host.prompt_text(&title, &label, &self.config.pipe_default) else {
            return ActionOutcome::Cancelled;
        };
        if fragment.trim().is_empty() {
            return ActionOutcome::Cancelled;
        }

        let Some(doc) = host.current_document() else {
            return ActionOutcome::NoDocument;
        };
        let text = doc.text().to_string();
        let name = doc.display_name();

        match run_filter(&self.scoped(FilterRequest::pipe(&text, &fragment))) {
            Ok(output) => {
                self.apply_output(host, &output.text, &t!("pipe.undo_description"));
                ActionOutcome::Applied
            }
            Err(FilterError::Cancelled) => ActionOutcome::Cancelled,
            Err(e) => {
                let message = match &e {
                    FilterError::Format {
                        exit_code,
                        diagnostic,
                    } => t!(
                        "pipe.error",
                        file = &name,
                        code = exit_code_text(*exit_code),
                        output = diagnostic
                    )
                    .to_string(),
                    other => t!(
                        "filter.failed",
                        file = &name,
                        label = t!("action.pipe"),
                        error = other
                    )
                    .to_string(),
                };
                report_error(host, &name, &message);
                ActionOutcome::Failed(e)
            }
        }
    }

    /// Send scratch files to the configured directory
    fn scoped<'a>(&self, request: FilterRequest<'a>) -> FilterRequest<'a> {
        match &self.scratch_dir {
            Some(dir) => request.in_dir(dir),
            None => request,
        }
    }

    fn apply_output(&self, host: &mut dyn Host, text: &str, description: &str) {
        if let Some(doc) = host.current_document() {
            doc.replace_all(text, description);
            tracing::debug!(
                "{}: replaced text ({} bytes)",
                doc.display_name(),
                text.len()
            );
        }
    }
}

/// Error text for a failed fixed formatter
fn formatter_error_message(formatter: &Formatter, name: &str, error: &FilterError) -> String {
    match error {
        FilterError::ToolMissing { tool, package } => t!(
            "filter.tool_missing",
            file = name,
            label = &formatter.label,
            tool = tool,
            package = package
        )
        .to_string(),
        FilterError::Format {
            exit_code: Some(code),
            ..
        } => t!(
            "filter.format_error",
            file = name,
            label = &formatter.label,
            code = code,
            kind = &formatter.kind
        )
        .to_string(),
        FilterError::Format {
            exit_code: None, ..
        } => t!(
            "filter.killed",
            file = name,
            label = &formatter.label,
            tool = formatter.program().unwrap_or_default()
        )
        .to_string(),
        FilterError::OutputUnreadable(e) => t!(
            "filter.output_unreadable",
            file = name,
            label = &formatter.label,
            error = e
        )
        .to_string(),
        other => t!(
            "filter.failed",
            file = name,
            label = &formatter.label,
            error = other
        )
        .to_string(),
    }
}

fn exit_code_text(exit_code: Option<i32>) -> String {
    exit_code
        .map(|c| c.to_string())
        .unwrap_or_else(|| t!("pipe.signal").to_string())
}

fn report_error(host: &mut dyn Host, name: &str, message: &str) {
    tracing::warn!("{}", message);
    host.switch_message_tab(MessageTab::Messages);
    host.msg_add(Severity::Error, Some(name), message);
}
