//! Outbound mail collaborator. Delivery transport is outside this service;
//! messages are handed off here and recorded in the log.

use tracing::info;

pub fn send_verification(email: &str, username: &str, link: &str) {
    info!(
        target: "mailer",
        email, username, link, "queued verification mail"
    );
}

pub fn send_password_reset(email: &str, username: &str, link: &str) {
    info!(
        target: "mailer",
        email, username, link, "queued password reset mail"
    );
}

pub fn send_article_share(recipient: &str, sender: &str, link: &str) {
    info!(
        target: "mailer",
        recipient, sender, link, "queued article share mail"
    );
}
