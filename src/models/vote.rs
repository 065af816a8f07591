use serde::{Deserialize, Serialize};

use crate::error::WidgetError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteType {
    Upvote,
    Downvote,
}

impl VoteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteType::Upvote => "upvote",
            VoteType::Downvote => "downvote",
        }
    }
}

impl std::fmt::Display for VoteType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VoteType {
    type Err = WidgetError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "upvote" => Ok(VoteType::Upvote),
            "downvote" => Ok(VoteType::Downvote),
            other => Err(WidgetError::UnknownVoteType(other.to_string())),
        }
    }
}

/// The visitor's current vote on an item; `None` means no vote.
pub type UserVote = Option<VoteType>;

// Vote request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoteIntent {
    #[serde(rename = "object_type")]
    pub content_type: String,
    #[serde(rename = "object_id")]
    pub content_id: String,
    pub vote_type: VoteType,
}

// Vote response
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VoteResponse {
    pub new_rating: i64,
    #[serde(default)]
    pub user_vote: UserVote,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn intent_uses_wire_field_names() {
        let intent = VoteIntent {
            content_type: "question".to_string(),
            content_id: "42".to_string(),
            vote_type: VoteType::Upvote,
        };

        assert_eq!(
            serde_json::to_value(&intent).unwrap(),
            json!({"object_type": "question", "object_id": "42", "vote_type": "upvote"})
        );
    }

    #[test]
    fn null_and_missing_user_vote_both_mean_no_vote() {
        let explicit: VoteResponse =
            serde_json::from_value(json!({"new_rating": 3, "user_vote": null})).unwrap();
        let missing: VoteResponse = serde_json::from_value(json!({"new_rating": 3})).unwrap();

        assert_eq!(explicit.user_vote, None);
        assert_eq!(missing.user_vote, None);
    }

    #[test]
    fn response_requires_rating() {
        let result = serde_json::from_value::<VoteResponse>(json!({"user_vote": "upvote"}));
        assert!(result.is_err());
    }

    #[test]
    fn vote_type_parses_attribute_values() {
        assert_eq!("downvote".parse::<VoteType>(), Ok(VoteType::Downvote));
        assert_eq!(
            "sideways".parse::<VoteType>(),
            Err(WidgetError::UnknownVoteType("sideways".to_string()))
        );
    }
}
