use serde::{Deserialize, Serialize};
use url::Url;

use crate::services::{favorites, mailer, ServiceError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareChannel {
    Email,
    Facebook,
    Twitter,
}

impl ShareChannel {
    pub fn parse(s: &str) -> Result<Self, ServiceError> {
        match s {
            "email" => Ok(ShareChannel::Email),
            "facebook" => Ok(ShareChannel::Facebook),
            "twitter" => Ok(ShareChannel::Twitter),
            other => Err(ServiceError::Validation(format!(
                "Unknown share channel '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ShareLink {
    pub channel: ShareChannel,
    pub link: String,
}

/// Build the outbound share link for an article. The email channel hands
/// the link to the mailer; the social channels return a prefilled intent
/// URL for the client to open.
pub fn share_article(
    channel: ShareChannel,
    slug: &str,
    sender: &str,
    recipient: Option<&str>,
) -> Result<ShareLink, ServiceError> {
    let article_link = favorites::article_url(slug)?;

    let link = match channel {
        ShareChannel::Email => {
            let recipient = recipient.ok_or_else(|| {
                ServiceError::Validation("Sharing by email requires a recipient".into())
            })?;
            crate::services::users::validate_email(recipient)?;
            mailer::send_article_share(recipient, sender, &article_link);
            article_link
        }
        ShareChannel::Facebook => {
            intent_url("https://www.facebook.com/sharer/sharer.php", "u", &article_link)?
        }
        ShareChannel::Twitter => {
            intent_url("https://twitter.com/intent/tweet", "url", &article_link)?
        }
    };

    Ok(ShareLink { channel, link })
}

fn intent_url(base: &str, param: &str, article_link: &str) -> Result<String, ServiceError> {
    let mut url = Url::parse(base)
        .map_err(|e| ServiceError::Validation(format!("Invalid share URL: {e}")))?;
    url.query_pairs_mut().append_pair(param, article_link);
    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn social_links_embed_the_article_url() {
        let facebook = share_article(ShareChannel::Facebook, "my-post", "amina", None).unwrap();
        assert!(facebook.link.starts_with("https://www.facebook.com/sharer/sharer.php?u="));
        assert!(facebook.link.contains("my-post"));

        let twitter = share_article(ShareChannel::Twitter, "my-post", "amina", None).unwrap();
        assert!(twitter.link.starts_with("https://twitter.com/intent/tweet?url="));
    }

    #[test]
    fn email_share_requires_recipient() {
        assert!(share_article(ShareChannel::Email, "my-post", "amina", None).is_err());
        assert!(
            share_article(ShareChannel::Email, "my-post", "amina", Some("not-an-email")).is_err()
        );
        let ok = share_article(ShareChannel::Email, "my-post", "amina", Some("x@example.com"))
            .unwrap();
        assert!(ok.link.contains("my-post"));
    }

    #[test]
    fn unknown_channel_is_rejected() {
        assert!(ShareChannel::parse("email").is_ok());
        assert!(ShareChannel::parse("myspace").is_err());
    }
}
