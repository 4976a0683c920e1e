//! Text of the owner notification and the client receipt.

use std::fmt::Write as _;

use docdrop_shared::OutgoingMail;

use super::policy::format_mib;
use super::staging::StagedFile;
use super::types::{ClientDetails, SubmissionRecord};

/// Detail line for one staged file: `<name> — <size> MB — <type>`.
#[must_use]
pub fn detail_line(file: &StagedFile) -> String {
    format!(
        "{} — {} MB — {}",
        file.display_name,
        format_mib(file.size),
        file.content_type
    )
}

/// Mail to the owner carrying the submission and its files.
#[must_use]
pub fn owner_notification(
    brand: &str,
    owner_email: &str,
    record: &SubmissionRecord,
    client: &ClientDetails,
    files: &[StagedFile],
) -> OutgoingMail {
    let subject = format!("New {brand} upload — Ref {}", record.reference);

    let phone = if client.client_phone.is_empty() {
        "(none provided)"
    } else {
        &client.client_phone
    };
    let note = if client.client_note.is_empty() {
        "(no message)"
    } else {
        &client.client_note
    };

    let mut body = format!(
        "New {brand} upload received.

Ref: {reference}
When: {when}

Client: {name} <{email}>
Phone: {phone}
Return Type: {return_type}
Dependents: {dependents}

Client Message:
{note}

Files:
",
        reference = record.reference,
        when = record.received_label(),
        name = client.client_name,
        email = client.client_email,
        return_type = client.return_type,
        dependents = client.dependents,
    );
    for file in files {
        let _ = writeln!(body, "• {}", detail_line(file));
    }
    body.push_str(
        "\n(These files were sent as email attachments at your request. No cloud storage was used.)\n",
    );

    OutgoingMail::new(owner_email, subject, body)
        .with_attachments(files.iter().map(StagedFile::to_attachment).collect())
}

/// Confirmation mail to the client. Never carries attachments.
#[must_use]
pub fn client_receipt(
    brand: &str,
    record: &SubmissionRecord,
    client: &ClientDetails,
) -> OutgoingMail {
    let subject = format!(
        "{brand} — We received your documents (Ref {})",
        record.reference
    );
    let name = if client.client_name.is_empty() {
        "Client"
    } else {
        &client.client_name
    };
    let body = format!(
        "Hello {name},

This is a confirmation that {brand} received your documents.
Reference ID: {reference}
Received: {when}

We will review your documents and contact you shortly.
If you have any questions, reply to this email.

— {brand}
",
        reference = record.reference,
        when = record.received_label(),
    );

    OutgoingMail::new(&client.client_email, subject, body)
}
