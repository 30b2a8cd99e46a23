// ABOUTME: Subject, plain-text, and HTML bodies for platform notification emails
// ABOUTME: Interpolated values are HTML-escaped before landing in markup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

use goya_core::models::{Career, Cohort, User};
use html_escape::encode_text;

const BRAND: &str = "Go Young Africa (GOYA)";

/// A rendered notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    /// Subject line
    pub subject: String,
    /// Plain-text body
    pub text: String,
    /// HTML body
    pub html: String,
}

fn html_page(title: &str, heading: &str, paragraphs: &[String]) -> String {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("        <p class=\"description\">{p}</p>\n"))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="UTF-8">
    <title>{title}</title>
    <style>
      body {{ font-family: Arial, sans-serif; text-align: center; margin: 0; padding: 0; }}
      .container {{ padding: 20px; }}
      .title {{ font-size: 24px; font-weight: bold; }}
      .description {{ font-size: 16px; color: #333; margin: 20px 0; }}
      .footer {{ font-size: 12px; color: #777; margin: 20px 0; }}
    </style>
  </head>
  <body>
    <div class="container">
        <h1 class="title">{heading}</h1>
{body}        <p class="footer">Best Regards,<br>GOYA Team</p>
    </div>
  </body>
</html>
"#
    )
}

/// Confirmation sent after a student is placed into a cohort
#[must_use]
pub fn enrollment_confirmation(user: &User, cohort: &Cohort, career: &Career) -> NotificationMessage {
    let start = cohort.start_date.format("%B %-d, %Y").to_string();
    let end = cohort.end_date.format("%B %-d, %Y").to_string();

    let subject = format!("Enrollment confirmed: {}", career.title);
    let text = format!(
        "Hello {name},\n\nYou are enrolled in the {career} program, cohort \"{cohort}\".\n\
         The cohort runs from {start} to {end}.\n\nBest Regards,\nGOYA Team\n",
        name = user.first_name,
        career = career.title,
        cohort = cohort.name,
    );
    let html = html_page(
        "Enrollment Confirmation",
        &format!("Welcome aboard, {}!", encode_text(&user.first_name)),
        &[
            format!(
                "You are enrolled in the <strong>{}</strong> program on <strong>{BRAND}</strong>.",
                encode_text(&career.title)
            ),
            format!(
                "Your cohort <strong>{}</strong> runs from {start} to {end}.",
                encode_text(&cohort.name)
            ),
        ],
    );

    NotificationMessage {
        subject,
        text,
        html,
    }
}

/// Sent when an admin approves a mentor account
#[must_use]
pub fn mentor_approved(user: &User) -> NotificationMessage {
    let name = user.display_name();
    NotificationMessage {
        subject: "Your mentor profile has been approved".to_owned(),
        text: format!(
            "Congratulations, {name}!\n\nYour mentor profile on {BRAND} has been approved. \
             You can now start engaging with students.\n\nBest Regards,\nGOYA Team\n"
        ),
        html: html_page(
            "Your Mentor Profile Has Been Approved!",
            &format!("Congratulations, {}!", encode_text(&name)),
            &[format!(
                "Your mentor profile on <strong>{BRAND}</strong> has been successfully approved!<br>\
                 You can now start engaging with students and sharing your expertise."
            )],
        ),
    }
}

/// Sent when an admin rejects a mentor account
#[must_use]
pub fn mentor_rejected(user: &User) -> NotificationMessage {
    let name = user.display_name();
    NotificationMessage {
        subject: "Your mentor application was not approved".to_owned(),
        text: format!(
            "Dear {name},\n\nUnfortunately, your mentor application on {BRAND} was not approved \
             at this time.\n\nBest Regards,\nGOYA Team\n"
        ),
        html: html_page(
            "Your Mentor Application Has Been Rejected",
            &format!("Dear {},", encode_text(&name)),
            &[format!(
                "Unfortunately, your mentor application on <strong>{BRAND}</strong> was not approved at this time."
            )],
        ),
    }
}
