//! HTML pages for the submission form and the status listing
//!
//! Every user-supplied string is escaped before it reaches the markup.

use crate::store::{IndexedRequest, RequestStatus};

const STYLE: &str = "body{font-family:sans-serif;max-width:52rem;margin:2rem auto;padding:0 1rem}\
label{display:block;margin-top:.75rem}input,textarea{width:100%;padding:.4rem}\
table{border-collapse:collapse;width:100%}th,td{border:1px solid #ccc;padding:.4rem;text-align:left}\
.Pending{color:#a60}.Approved{color:#070}.Rejected{color:#a00}";

/// Escape text for HTML element and attribute content
pub fn escape_html(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&#x27;"),
            c => output.push(c),
        }
    }
    output
}

fn layout(title: &str, content: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
        <title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html(title),
        STYLE,
        content
    )
}

/// GET / - outpass submission form
pub fn render_home() -> String {
    let fields = [
        ("studentName", "Student Name", "text"),
        ("rollNumber", "Roll Number", "text"),
        ("studentMobile", "Student Mobile", "tel"),
        ("parentMobile", "Parent Mobile", "tel"),
        ("studentEmail", "Student Email", "email"),
    ];

    let mut inputs = String::new();
    for (name, label, kind) in fields {
        inputs.push_str(&format!(
            "<label for=\"{name}\">{label}</label>\n\
            <input id=\"{name}\" name=\"{name}\" type=\"{kind}\">\n"
        ));
    }

    let content = format!(
        "<h1>Hostel Outpass Request</h1>\n\
        <form method=\"post\" action=\"/submit_form\">\n\
        {inputs}\
        <label for=\"reason\">Reason</label>\n\
        <textarea id=\"reason\" name=\"reason\" rows=\"3\"></textarea>\n\
        <p><button type=\"submit\">Submit Request</button></p>\n\
        </form>\n\
        <p><a href=\"/status\">View request status</a></p>"
    );

    layout("Outpass Request", &content)
}

/// GET /status - every request with its index and status
pub fn render_status(requests: &[IndexedRequest]) -> String {
    let mut rows = String::new();
    for entry in requests {
        let r = &entry.request;
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td class=\"{}\">{}</td></tr>\n",
            entry.index,
            escape_html(&r.student_name),
            escape_html(&r.roll_number),
            escape_html(&r.reason),
            r.status.as_str(),
            r.status.as_str(),
        ));
    }

    let pending = requests
        .iter()
        .filter(|e| e.request.status == RequestStatus::Pending)
        .count();

    let body = if requests.is_empty() {
        "<p>No outpass requests yet.</p>".to_string()
    } else {
        format!(
            "<p>{} request(s), {} pending.</p>\n<table>\n\
            <tr><th>#</th><th>Name</th><th>Roll Number</th><th>Reason</th><th>Status</th></tr>\n\
            {}</table>",
            requests.len(),
            pending,
            rows
        )
    };

    let content = format!(
        "<h1>Outpass Request Status</h1>\n{}\n<p><a href=\"/\">New request</a></p>",
        body
    );

    layout("Outpass Status", &content)
}
