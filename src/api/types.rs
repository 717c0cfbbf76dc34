use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Domain Types
// ============================================================================

/// Time window the backend uses when ingesting top posts for a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Day,
    Month,
}

impl SortBy {
    pub fn as_str(self) -> &'static str {
        match self {
            SortBy::Day => "day",
            SortBy::Month => "month",
        }
    }

    /// Flip between the two windows (used by the subscribe dialog).
    pub fn toggle(self) -> Self {
        match self {
            SortBy::Day => SortBy::Month,
            SortBy::Month => SortBy::Day,
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(SortBy::Day),
            "month" => Ok(SortBy::Month),
            other => Err(format!("unknown sort window '{other}' (expected day or month)")),
        }
    }
}

/// A subscribed channel as held by the client.
///
/// `name` is the backend's canonical identifier and the identity key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub name: String,
    pub subscriber_count: u64,
}

/// An ingested post.
///
/// `channel` is only populated for search results; per-channel listings leave
/// it empty since the channel is already known.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub discussion_url: String,
    pub comment_count: u64,
    pub upvotes: i64,
    #[serde(rename = "subredditName", default)]
    pub channel: Option<String>,
}

// ============================================================================
// Wire Types
// ============================================================================

/// Entry of `GET /subreddits/`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListedChannel {
    pub name: String,
    pub number_of_subscribers: u64,
}

impl From<ListedChannel> for Channel {
    fn from(c: ListedChannel) -> Self {
        Channel {
            name: c.name,
            subscriber_count: c.number_of_subscribers,
        }
    }
}

/// Body of `POST /subreddits/ingest`.
///
/// The backend serializes this record with Go's default field names, so the
/// keys are capitalized unlike every other response.
#[derive(Debug, Deserialize)]
pub(crate) struct SubscribedChannel {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "NumberOfSubscribers")]
    pub number_of_subscribers: u64,
}

impl From<SubscribedChannel> for Channel {
    fn from(c: SubscribedChannel) -> Self {
        Channel {
            name: c.name,
            subscriber_count: c.number_of_subscribers,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SubscriptionRequest<'a> {
    pub name: &'a str,
    pub sort_by: SortBy,
}

#[derive(Debug, Serialize)]
pub(crate) struct IngestRequest<'a> {
    pub subreddit: SubscriptionRequest<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IngestAllRequest {
    pub sort_by: SortBy,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub posts: Vec<Post>,
}

/// Error envelope the backend uses for failed requests.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_listed_and_subscribed_normalize_to_same_channel() {
        let listed: ListedChannel =
            serde_json::from_str(r#"{"name":"golang","numberOfSubscribers":5000}"#).unwrap();
        let subscribed: SubscribedChannel = serde_json::from_str(
            r#"{"Name":"golang","NumberOfSubscribers":5000,"Posts":[]}"#,
        )
        .unwrap();

        assert_eq!(Channel::from(listed), Channel::from(subscribed));
    }

    #[test]
    fn test_post_without_channel_field() {
        let post: Post = serde_json::from_str(
            r#"{"title":"t","content":"c","discussionUrl":"https://reddit.com/x","commentCount":3,"upvotes":-2}"#,
        )
        .unwrap();
        assert_eq!(post.channel, None);
        assert_eq!(post.upvotes, -2);
    }

    #[test]
    fn test_post_with_channel_field() {
        let post: Post = serde_json::from_str(
            r#"{"title":"t","content":"c","discussionUrl":"https://reddit.com/x","commentCount":0,"upvotes":1,"subredditName":"travel"}"#,
        )
        .unwrap();
        assert_eq!(post.channel.as_deref(), Some("travel"));
    }

    #[test]
    fn test_ingest_request_shape() {
        let body = IngestRequest {
            subreddit: SubscriptionRequest {
                name: "golang",
                sort_by: SortBy::Month,
            },
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"subreddit": {"name": "golang", "sortBy": "month"}})
        );
    }

    #[test]
    fn test_sort_by_parse() {
        assert_eq!("day".parse::<SortBy>(), Ok(SortBy::Day));
        assert_eq!(" Month ".parse::<SortBy>(), Ok(SortBy::Month));
        assert!("week".parse::<SortBy>().is_err());
        assert_eq!(SortBy::Day.toggle(), SortBy::Month);
    }
}
