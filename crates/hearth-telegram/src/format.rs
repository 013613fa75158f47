//! Telegram HTML formatting for approval traffic.

use hearth_approval::ApprovalRequest;
use std::time::Duration;

/// Escape text for safe inclusion in Telegram HTML.
///
/// Escapes `&`, `<`, `>`, `"`, and `'` so the output is safe in both text
/// content and HTML attributes.
pub fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Render the approval prompt for `request`.
///
/// The reply syntax with the request id appears verbatim so the operator
/// can copy it, and the auto-reject deadline is spelled out.
pub(crate) fn approval_prompt(request: &ApprovalRequest, timeout: Duration) -> String {
    let severity = request.severity.as_str().to_uppercase();
    format!(
        "<b>Approval Required</b> [{}]\n\n<b>{}</b>\n{}\n\n\
         Reply <code>/approve {id}</code> to allow or <code>/reject {id}</code> to refuse.\n\
         No decision within {}s rejects automatically.",
        html_escape(&severity),
        html_escape(&request.action),
        html_escape(&request.details),
        timeout.as_secs(),
        id = request.id,
    )
}
