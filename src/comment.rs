//! Markdown rendering of result records for the pull-request comment.

use crate::models::{KeyValue, ResultRecord};

/// Hidden marker identifying the action's comment on a pull request.
pub const COMMENT_MARKER: &str = "<!-- msgram-action-comment -->";

pub fn create_message(results: &[ResultRecord]) -> String {
    let mut message = format!("{COMMENT_MARKER}\n## MeasureSoftGram Analysis\n\n");

    if results.is_empty() {
        message.push_str("No results were calculated for this pull request.\n");
        return message;
    }

    for (index, record) in results.iter().enumerate() {
        if results.len() > 1 {
            message.push_str(&format!("### Result {}\n\n", index + 1));
        }
        push_table(&mut message, "Characteristic", &record.characteristics);
        push_table(&mut message, "Subcharacteristic", &record.subcharacteristics);
        push_table(&mut message, "Measure", &record.measures);
        for tsqmi in &record.tsqmi {
            message.push_str(&format!("**TSQMI:** {:.4}\n\n", tsqmi.value));
        }
    }

    message
}

fn push_table(message: &mut String, header: &str, values: &[KeyValue]) {
    if values.is_empty() {
        return;
    }
    message.push_str(&format!("| {header} | Value |\n| --- | --- |\n"));
    for KeyValue { key, value } in values {
        message.push_str(&format!("| {key} | {value:.4} |\n"));
    }
    message.push('\n');
}
