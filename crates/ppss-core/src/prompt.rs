//! Prompt templates for personalized agents, the stage summarizer, and the
//! data-analysis assistant.

use ppss_types::analysis::ContextDoc;
use ppss_types::message::ContentPart;
use ppss_types::stage::{Stage, StageTranscriptEntry};

/// System prompt for a personalized agent, parameterized only by role.
///
/// Applied once, when the profile is first created.
pub fn system_prompt_for(stakeholder_type: &str) -> String {
    format!(
        "너는 {stakeholder_type}에게 특화된 personalized agent이다. 너의 임무는 사용자 질문을 이해하고 단계별 계획, 문제정의, 데이터해석, 디자인생성 등을 지원하는 것이다."
    )
}

/// System prompt for the cross-user stage summarizer.
pub fn summarizer_system_prompt(stage: Stage) -> String {
    format!(
        "You are chat_summary_agent. Summarize cross-user conversations for the {stage} stage, highlighting convergences, conflicts, and actionable next steps."
    )
}

/// User message carrying the flattened transcript to summarize.
pub fn summary_request(stage: Stage, transcript: &[StageTranscriptEntry]) -> String {
    let lines = transcript
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Summarize the following cross-user {stage} transcript into concise bullets with convergences, conflicts, and next steps.\n{lines}"
    )
}

const ANALYSIS_INSTRUCTION: &str = "You are in the data analysis stage. Use the provided text and image evidence to answer with succinct bullets, citing the case numbers when relevant.";

/// System prompt for a one-shot analysis question.
pub fn analysis_system_prompt(profile_prompt: &str) -> String {
    format!("{profile_prompt} {ANALYSIS_INSTRUCTION}")
}

/// Ordered content parts for an analysis question and its context documents.
pub fn analysis_parts(user_question: &str, context_docs: &[ContextDoc]) -> Vec<ContentPart> {
    let mut parts = vec![
        ContentPart::Text {
            text: format!("User question: {user_question}"),
        },
        ContentPart::Text {
            text: "Context documents provided below.".to_string(),
        },
    ];

    for doc in context_docs {
        let title = doc
            .title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or("Untitled");
        let text = doc.text.as_deref().unwrap_or("");
        parts.push(ContentPart::Text {
            text: format!("{title}: {text}").trim().to_string(),
        });
        if let Some(image) = doc.image.as_deref().filter(|i| !i.is_empty()) {
            parts.push(ContentPart::ImageUrl {
                url: image.to_string(),
            });
        }
    }

    parts
}
