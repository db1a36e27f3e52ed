//! Editorial seed for an empty blog.

use chrono::{DateTime, TimeDelta, Utc};

use mindstream_core::domain::Post;

fn seed_post(
    id: &str,
    title: &str,
    summary: &str,
    content: &str,
    tags: &[&str],
    created_at: DateTime<Utc>,
    reading_time: u32,
) -> Post {
    Post {
        id: id.to_string(),
        title: title.to_string(),
        summary: summary.to_string(),
        content: content.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        created_at,
        reading_time: Some(reading_time),
    }
}

/// The three posts written into a fresh post file, dated relative to `now`.
pub fn seed_posts(now: DateTime<Utc>) -> Vec<Post> {
    vec![
        seed_post(
            "crag-study",
            "CRAG: Corrective Retrieval Augmented Generation",
            "A robust framework designed to address the hallucinations in RAG by adding a self-corrective retrieval evaluator.",
            "Retrieval-Augmented Generation (RAG) is great, but what happens when the retriever fetches garbage? The generator typically hallucinates an answer based on that garbage.\n\n\
### The Problem\n\
Standard RAG blindly trusts the retrieved documents. If the relevance is low, the model is misled.\n\n\
### The CRAG Solution\n\
Corrective RAG introduces a lightweight \"Retrieval Evaluator\" after the retrieval step. It classifies retrieved documents into three categories:\n\
1. **Correct:** Use them for generation.\n\
2. **Ambiguous:** Combine with a web search for more context.\n\
3. **Incorrect:** Discard and rely entirely on web search fallback.\n\n\
### My Takeaway\n\
This adds a necessary \"critic\" loop to the pipeline.",
            &["AI", "RAG", "CRAG", "NLP"],
            now - TimeDelta::days(1),
            4,
        ),
        seed_post(
            "self-improving-rag",
            "Self-Improving RAG: The Infinite Loop",
            "Exploring how RAG systems can generate their own training data to iteratively refine both retrieval and generation.",
            "The concept of Self-Improving RAG is fascinating.\n\n\
### How it works\n\
1. **Generate & Critique:** The system generates an answer and critiques its own output.\n\
2. **Data Creation:** High-quality generations are added to a training set.\n\
3. **Fine-tuning:** The retriever and generator are fine-tuned based on results.",
            &["AI", "RAG", "Machine Learning"],
            now - TimeDelta::days(2),
            5,
        ),
        seed_post(
            "seed-transformers",
            "Attention Is All You Need: Understanding Transformers",
            "A deep dive into the architecture that revolutionized NLP.",
            "The Transformer model, introduced in \"Attention Is All You Need\" (2017), marked a turning point in NLP.\n\n\
### Self-Attention\n\
Self-attention allows the model to look at all words simultaneously, enabling parallel training and drastically better long-range dependency handling.",
            &["AI", "Deep Learning", "Transformers", "NLP"],
            now - TimeDelta::days(5),
            3,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_is_newest_first_with_unique_ids() {
        let now = Utc::now();
        let posts = seed_posts(now);

        assert_eq!(posts.len(), 3);
        assert!(posts.windows(2).all(|w| w[0].created_at > w[1].created_at));

        let ids: std::collections::HashSet<_> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.len(), 3);
        assert!(posts.iter().all(|p| p.created_at < now));
    }
}
