//! Prompt construction

use sheetqa_core::ChatMessage;

/// Reply the model is told to give when the data cannot answer the question
pub const INSUFFICIENT_DATA: &str = "INSUFFICIENT_DATA";

/// Fixed system instruction
pub const SYSTEM_PROMPT: &str = "You are an assistant that answers questions only from the \
provided dataset about a café's sales. Return concise, accurate answers. If you cannot answer \
from the data, say \"INSUFFICIENT_DATA\". Do not hallucinate.";

/// User message embedding the dataset and the question
pub fn build_user_message(csv: &str, question: &str) -> String {
    format!("Dataset (CSV with header on first row):\n{csv}\n\nQuestion: {question}\nAnswer:")
}

/// System instruction followed by the user message
pub fn build_messages(csv: &str, question: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(build_user_message(csv, question)),
    ]
}
