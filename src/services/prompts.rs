//! Prompt templates for every generation call site.

use crate::domain::models::{Complexity, ReasoningStep, RetrievedDocument};

/// Classification prompt: recent history, retrieved passages, current code
/// and the query, asking for a single literal token.
pub fn classification(
    query: &str,
    recent_history: &[String],
    documents: &[RetrievedDocument],
    code: &str,
) -> String {
    let history = recent_history.join("\n");
    let similar = documents
        .iter()
        .map(|doc| doc.content.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Consider the context of the last {count} messages below:\n\n\
         {history}\n\n\
         Also consider the following similar documents:\n\n\
         {similar}\n\n\
         And consider the current code:\n\n\
         {code}\n\n\
         Based on this context and the following question:\n\n\
         Question: {query}\n\n\
         Determine whether the question requires a simple or a complex answer.\n\
         Answer only with \"{simple}\" or \"{complex}\".\n",
        count = recent_history.len(),
        simple = Complexity::Simple.token(),
        complex = Complexity::Complex.token(),
    )
}

/// Reasoning-phase prompt; verbosity follows `complexity`.
pub fn reasoning(query: &str, code: &str, complexity: Complexity) -> String {
    let (depth, detail) = match complexity {
        Complexity::Complex => ("complex", "Provide a detailed answer for each step."),
        Complexity::Simple => ("simple", "Provide a concise answer for each step."),
    };

    format!(
        "Question: {query}\n\
         The current code is:\n{code}\n\n\
         Generate a {depth} chain of thought to answer the question above, using the following steps:\n\
         {steps}\n\
         {detail}\n",
        steps = ReasoningStep::catalog(),
    )
}

/// Final-answer prompt built on the reasoning text.
pub fn final_answer(query: &str, reasoning: &str) -> String {
    format!(
        "Based on the following chain of thought:\n{reasoning}\n\
         Provide a direct and concise answer to the original question: {query}\n"
    )
}

/// Fresh code solution for an empty editor.
pub fn fresh_code(query: &str, reasoning: &str, final_answer: &str) -> String {
    format!(
        "Based on the chain of thought and the final answer provided, write code that solves \
         the problem described in the user's query.\n\n\
         User query: {query}\n\n\
         Chain of thought: {reasoning}\n\n\
         Final answer: {final_answer}\n\n\
         Code solution:"
    )
}

/// Modification proposal for existing code.
pub fn code_modification(query: &str, reasoning: &str, final_answer: &str, code: &str) -> String {
    format!(
        "The current code is:\n{code}\n\n\
         Based on the user's query: {query}\n\
         The chain of thought: {reasoning}\n\
         And the final answer: {final_answer}\n\
         Suggest modifications or improvements to the existing code to address the query. \
         Return the complete updated code in a single code block.\n"
    )
}

/// Ask the model to merge every code block of `text` into one.
pub fn synthesis(text: &str) -> String {
    format!(
        "The response below contains multiple code blocks. Synthesize all of them into a \
         single working code block and return only that block.\n\n\
         Original response:\n{text}\n\n\
         Synthesized response:\n"
    )
}

/// Ask for a short description of a code block.
pub fn describe_code(code: &str) -> String {
    format!(
        "Describe in one short paragraph what the following code does. \
         Answer with plain text only, no code.\n\n{code}\n"
    )
}

/// Ask for a short observation (caveats, assumptions) about a code block.
pub fn observe_code(code: &str) -> String {
    format!(
        "Write one short paragraph with the most important observation about the following \
         code, such as assumptions, limitations or caveats. Answer with plain text only, \
         no code.\n\n{code}\n"
    )
}

/// Break a request into smaller subqueries.
pub fn subqueries(query: &str) -> String {
    format!(
        "Break the following request down into a series of smaller, manageable subqueries, \
         one per line:\n{query}"
    )
}
