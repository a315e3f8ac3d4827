//! GeminiClient - Direct REST API implementation of the interview oracles.
//!
//! Calls the Gemini `generateContent` endpoint directly over HTTP. One
//! client implements all three oracle traits (question generation, answer
//! scoring, session summarization); each call is a single request/response
//! with a JSON-schema'd body where structured output is needed.

use alexis_core::error::{AlexisError, Result};
use alexis_core::interview::{
    clamp_score, AnswerEvaluation, GrammarCorrection, InterviewConfig, InterviewFeedback,
    InterviewSummary, TranscriptEntry,
};
use alexis_core::oracle::{CandidateContext, FeedbackOracle, QuestionOracle, SummaryOracle};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::env;
use tracing::debug;

const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Oracle client backed by the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Creates a new client with the provided API key and the default model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
        }
    }

    /// Loads configuration from environment variables.
    ///
    /// `GEMINI_API_KEY` is required; `ALEXIS_MODEL_NAME` overrides the
    /// default model.
    pub fn try_from_env() -> Result<Self> {
        let api_key = env::var("GEMINI_API_KEY").map_err(|_| {
            AlexisError::config("GEMINI_API_KEY not found in the environment")
        })?;
        let model =
            env::var("ALEXIS_MODEL_NAME").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.into());
        Ok(Self::new(api_key).with_model(model))
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    async fn generate(&self, prompt: String, json_response: bool) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: json_response.then(|| GenerationConfig {
                response_mime_type: "application/json".to_string(),
            }),
        };

        let url = format!("{}/{}:generateContent", BASE_URL, self.model);
        debug!(model = %self.model, json_response, "sending generateContent request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|err| AlexisError::oracle(format!("Gemini API request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, body));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|err| AlexisError::oracle(format!("Failed to parse Gemini response: {err}")))?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl QuestionOracle for GeminiClient {
    async fn next_question(
        &self,
        config: &InterviewConfig,
        history: &[TranscriptEntry],
        candidate: &CandidateContext,
        question_number: usize,
    ) -> Result<String> {
        let prompt = build_question_prompt(config, history, candidate, question_number)?;
        let text = self.generate(prompt, false).await?;
        Ok(text.trim().to_string())
    }
}

#[async_trait]
impl FeedbackOracle for GeminiClient {
    async fn evaluate_answer(&self, question: &str, answer: &str) -> Result<InterviewFeedback> {
        let prompt = build_feedback_prompt(question, answer);
        let text = self.generate(prompt, true).await?;
        let wire: FeedbackWire = serde_json::from_str(text.trim())
            .map_err(|err| AlexisError::oracle(format!("Malformed feedback payload: {err}")))?;
        Ok(wire.into_feedback())
    }
}

#[async_trait]
impl SummaryOracle for GeminiClient {
    async fn summarize(&self, feedback: &[InterviewFeedback]) -> Result<InterviewSummary> {
        let prompt = build_summary_prompt(feedback)?;
        let text = self.generate(prompt, true).await?;
        let summary: InterviewSummary = serde_json::from_str(text.trim())
            .map_err(|err| AlexisError::oracle(format!("Malformed summary payload: {err}")))?;
        Ok(summary)
    }
}

// ---- Prompts ----------------------------------------------------------------

fn build_question_prompt(
    config: &InterviewConfig,
    history: &[TranscriptEntry],
    candidate: &CandidateContext,
    question_number: usize,
) -> Result<String> {
    let history_summary = if history.is_empty() {
        "This is the first question of the interview.".to_string()
    } else {
        let digest: Vec<_> = history
            .iter()
            .map(|h| {
                serde_json::json!({
                    "question": h.question,
                    "answerQuality": h.feedback.response_quality,
                })
            })
            .collect();
        format!(
            "Interview History (previous questions and answer quality scores): {}",
            serde_json::to_string(&digest)?
        )
    };

    Ok(format!(
        r#"# Persona: Expert Interviewer (Alexis)
You are Alexis, an AI interviewer hiring for a "{role}" position. You are conducting a {difficulty} level {interview_type} interview with a {persona} persona.

# Candidate Context
- Resume Summary: "{summary}"
- Key Skills: [{skills}]

# Interview Progress
{history_summary}

# Task
Your task is to generate the NEXT interview question ({question_number}).
1.  The question must be relevant to the "{role}" position and tailored to the candidate's resume.
2.  **Crucially, you must adapt the difficulty.** If previous answers were strong (e.g., answerQuality > 75), ask a more challenging follow-up or a new complex question. If they were weak (e.g., answerQuality < 50), ask a simpler, foundational question to help the candidate recover.
3.  Do not repeat questions from the history.
4.  Ensure the question is open-ended and encourages a detailed response.
5.  Return ONLY the question text as a string. Do not include any other text, JSON, or explanation."#,
        role = config.role,
        difficulty = config.difficulty,
        interview_type = config.interview_type,
        persona = config.persona,
        summary = candidate.summary,
        skills = candidate.skills.join(", "),
        history_summary = history_summary,
        question_number = question_number,
    ))
}

fn build_feedback_prompt(question: &str, answer: &str) -> String {
    format!(
        r#"# Persona: Alexis, AI Interview Coach
You are Alexis, a friendly, insightful, and encouraging AI career coach conducting a mock interview. Your goal is to provide precise, personalized feedback to help the candidate improve.

# Task: Evaluate Interview Answer
Analyze the candidate's answer and provide structured feedback as JSON.

# Evaluation Criteria
- **Clarity:** Is the response easy to understand and well-articulated?
- **Relevance:** Does the answer directly address the question?
- **Confidence:** Is the tone self-assured and composed? (Inferred from text)
- **Structure:** Is the response logically organized (e.g., using the STAR method)?
- **Example Usage:** Are concrete examples, stories, or data used to support the answer?
- **Grammar & Vocabulary:** Assess for errors, filler words ('um', 'uh', 'like', 'so', 'you know'), and professional language.

# Feedback Rules
1.  Provide a strict `score` from 0-100 for overall performance and a separate `responseQuality` score from 0-100 for the transcript view.
2.  Fill the `evaluation` object (clarity, relevance, structure, confidence) with concise, one-sentence feedback per category.
3.  Fill `grammarCorrection` (hasErrors, explanation), count `wordCount` and `fillerWords`, and set `hasExample`.
4.  Provide a strong `professionalRewrite` of the answer and 1-2 actionable `tips`.
5.  Write a short, conversational, encouraging spoken reply in `alexisResponse`.

# Input
- Question: "{question}"
- Candidate's Answer: "{answer}"

# Output
Respond ONLY with a JSON object using exactly these keys: score, responseQuality, evaluation, grammarCorrection, professionalRewrite, tips, alexisResponse, wordCount, fillerWords, hasExample."#,
    )
}

fn build_summary_prompt(feedback: &[InterviewFeedback]) -> Result<String> {
    let digest: Vec<_> = feedback
        .iter()
        .map(|f| {
            serde_json::json!({
                "score": f.score,
                "tips": f.tips,
                "evaluation": f.evaluation,
                "responseQuality": f.response_quality,
            })
        })
        .collect();

    Ok(format!(
        r#"# Persona: Alexis, AI Interview Coach
You are Alexis, a friendly, insightful, and encouraging AI career coach.

# Task: Summarize Interview Performance
The mock interview is complete. Provide a final summary based on the entire session's feedback data.

# Summary Rules
1.  **overallSummary:** A friendly, 2-3 sentence summary mentioning both strengths and key areas for practice.
2.  **actionableTips:** 3-5 concrete, actionable tips based on recurring patterns in the feedback.
3.  **Simulated non-verbal analysis:** Based on the confidence and quality of the text responses, provide brief, hypothetical, encouraging analyses for simulatedFacialExpressionAnalysis, simulatedBodyLanguageAnalysis, and simulatedAudioAnalysis.
4.  **encouragement:** End with a final, positive, encouraging sentence.

# Input
- All feedback given during the session: {digest}

# Output
Respond ONLY with a JSON object using exactly these keys: overallSummary, actionableTips, encouragement, simulatedFacialExpressionAnalysis, simulatedBodyLanguageAnalysis, simulatedAudioAnalysis."#,
        digest = serde_json::to_string(&digest)?,
    ))
}

// ---- Wire types -------------------------------------------------------------

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Feedback as the model returns it: numbers arrive as raw JSON numbers
/// and are coerced into the 0-100 domain range on conversion.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FeedbackWire {
    #[serde(default)]
    score: f64,
    #[serde(default)]
    response_quality: f64,
    evaluation: AnswerEvaluation,
    grammar_correction: GrammarCorrection,
    #[serde(default)]
    professional_rewrite: String,
    #[serde(default)]
    tips: Vec<String>,
    #[serde(default)]
    alexis_response: String,
    #[serde(default)]
    word_count: f64,
    #[serde(default)]
    filler_words: f64,
    #[serde(default)]
    has_example: bool,
}

impl FeedbackWire {
    fn into_feedback(self) -> InterviewFeedback {
        InterviewFeedback {
            score: clamp_score(self.score),
            response_quality: clamp_score(self.response_quality),
            evaluation: self.evaluation,
            grammar_correction: self.grammar_correction,
            professional_rewrite: self.professional_rewrite,
            tips: self.tips,
            alexis_response: self.alexis_response,
            word_count: self.word_count.max(0.0) as u32,
            filler_words: self.filler_words.max(0.0) as u32,
            has_example: self.has_example,
        }
    }
}

fn extract_text_response(response: GenerateContentResponse) -> Result<String> {
    response
        .candidates
        .into_iter()
        .flat_map(|c| c.content.parts)
        .map(|p| p.text)
        .find(|t| !t.trim().is_empty())
        .ok_or_else(|| AlexisError::oracle("Gemini API returned no text in the response"))
}

fn map_http_error(status: StatusCode, body: String) -> AlexisError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or_else(|_| body.clone());
    AlexisError::oracle(format!("Gemini API error ({}): {}", status.as_u16(), message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alexis_core::interview::{Difficulty, InterviewType, InterviewerPersona};

    fn config() -> InterviewConfig {
        InterviewConfig {
            interview_type: InterviewType::RoleSpecific,
            difficulty: Difficulty::Hard,
            persona: InterviewerPersona::Strict,
            role: "Site Reliability Engineer".to_string(),
        }
    }

    #[test]
    fn question_prompt_mentions_role_and_ordinal() {
        let candidate = CandidateContext {
            summary: "Five years running large fleets.".to_string(),
            skills: vec!["Kubernetes".to_string(), "Terraform".to_string()],
        };
        let prompt = build_question_prompt(&config(), &[], &candidate, 1).unwrap();
        assert!(prompt.contains("Site Reliability Engineer"));
        assert!(prompt.contains("Hard level Role-Specific interview"));
        assert!(prompt.contains("first question of the interview"));
        assert!(prompt.contains("Kubernetes, Terraform"));
    }

    #[test]
    fn question_prompt_includes_answer_quality_history() {
        let mut feedback = InterviewFeedback::fallback("a");
        feedback.response_quality = 82;
        let history = vec![TranscriptEntry {
            question: "Tell me about an outage.".to_string(),
            answer: "a".to_string(),
            feedback,
            notes: None,
            duration: Some(40),
        }];
        let prompt =
            build_question_prompt(&config(), &history, &CandidateContext::default(), 2).unwrap();
        assert!(prompt.contains("answerQuality"));
        assert!(prompt.contains("Tell me about an outage."));
    }

    #[test]
    fn feedback_wire_clamps_out_of_range_scores() {
        let json = r#"{
            "score": 132.7,
            "responseQuality": -4,
            "evaluation": {"clarity": "c", "relevance": "r", "structure": "s", "confidence": "f"},
            "grammarCorrection": {"hasErrors": true, "explanation": "Minor slips."},
            "professionalRewrite": "Better answer.",
            "tips": ["Slow down."],
            "alexisResponse": "Nice work!",
            "wordCount": 87,
            "fillerWords": 3,
            "hasExample": true
        }"#;
        let wire: FeedbackWire = serde_json::from_str(json).unwrap();
        let feedback = wire.into_feedback();
        assert_eq!(feedback.score, 100);
        assert_eq!(feedback.response_quality, 0);
        assert_eq!(feedback.word_count, 87);
        assert!(feedback.has_example);
    }

    #[test]
    fn missing_optional_wire_fields_default() {
        let json = r#"{
            "evaluation": {"clarity": "c", "relevance": "r", "structure": "s", "confidence": "f"},
            "grammarCorrection": {"hasErrors": false, "explanation": ""}
        }"#;
        let wire: FeedbackWire = serde_json::from_str(json).unwrap();
        let feedback = wire.into_feedback();
        assert_eq!(feedback.score, 0);
        assert!(feedback.tips.is_empty());
    }

    #[test]
    fn response_text_extraction_skips_empty_parts() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": ""}, {"text": "What drives you?"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text_response(response).unwrap(), "What drives you?");
    }

    #[test]
    fn http_error_extracts_api_message() {
        let err = map_http_error(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"error": {"message": "Quota exceeded"}}"#.to_string(),
        );
        assert!(err.to_string().contains("Quota exceeded"));
        assert!(err.to_string().contains("429"));
    }

    #[test]
    fn summary_prompt_digests_scores() {
        let mut feedback = InterviewFeedback::fallback("a");
        feedback.score = 71;
        let prompt = build_summary_prompt(&[feedback]).unwrap();
        assert!(prompt.contains("\"score\":71"));
        assert!(prompt.contains("simulatedAudioAnalysis"));
    }
}
