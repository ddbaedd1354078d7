//! Wire models for listed backend resources.

// self
use crate::{_prelude::*, listing::Tagged};

/// Blog post as returned by `GET /blogs`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
	/// Backend identifier.
	pub id: u64,
	/// Headline.
	pub title: String,
	/// Teaser shown on cards.
	#[serde(default)]
	pub summary: Option<String>,
	/// Cover image location.
	#[serde(default)]
	pub image_url: Option<String>,
	/// Author display name.
	#[serde(default)]
	pub author: Option<String>,
	/// Primary category.
	#[serde(default)]
	pub category: Option<String>,
	/// Free-form tags.
	#[serde(default)]
	pub tags: Vec<String>,
}
impl Tagged for BlogPost {
	fn has_tag(&self, tag: &str) -> bool {
		self.category.as_deref() == Some(tag) || self.tags.iter().any(|t| t == tag)
	}
}

/// Skin-care quiz as returned by `GET /quizzes`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
	/// Backend identifier.
	pub id: u64,
	/// Quiz title.
	pub title: String,
	/// Skin types the quiz targets (`dry`, `oily`, ...).
	#[serde(default)]
	pub skin_types: Vec<String>,
	/// Number of questions.
	#[serde(default)]
	pub question_count: u32,
}
impl Tagged for Quiz {
	fn has_tag(&self, tag: &str) -> bool {
		self.skin_types.iter().any(|t| t == tag)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn blog_posts_match_on_category_or_tags() {
		let post: BlogPost = serde_json::from_str(
			r#"{"id":3,"title":"Double cleansing","category":"routine","tags":["oil","foam"]}"#,
		)
		.expect("Blog post should deserialize.");

		assert!(post.has_tag("routine"));
		assert!(post.has_tag("foam"));
		assert!(!post.has_tag("Foam"));
		assert!(post.summary.is_none());
	}

	#[test]
	fn quizzes_match_on_skin_type() {
		let quiz: Quiz =
			serde_json::from_str(r#"{"id":1,"title":"Find your routine","skinTypes":["dry"]}"#)
				.expect("Quiz should deserialize.");

		assert!(quiz.has_tag("dry"));
		assert!(!quiz.has_tag("oily"));
		assert_eq!(quiz.question_count, 0);
	}
}
