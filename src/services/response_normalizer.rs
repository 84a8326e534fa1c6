//! Response normalizer: collapse generated text to at most one code region.

use serde_json::json;
use std::sync::Arc;

use crate::domain::models::{
    AnnotationMode, CodeRegion, DecodingPolicy, Generation, NormalizationKind,
    NormalizedCodeResponse, NormalizerConfig,
};
use crate::domain::ports::{fields, Level, Logger};
use crate::services::fence;
use crate::services::generation_client::GenerationClient;
use crate::services::prompts;

const DESCRIPTION_LABEL: &str = "Description:";
const OBSERVATION_LABEL: &str = "Observation:";
const FOOTER_LABEL: &str = "Additional observation:";
const FOOTER_TEXT: &str = "No additional observation.";
const ANNOTATION_LABELS: [&str; 3] = [DESCRIPTION_LABEL, OBSERVATION_LABEL, FOOTER_LABEL];

/// Comment syntax used for the synthetic header and footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// `"""` docstring blocks (python and untagged regions)
    TripleQuote,
    /// `/* */` blocks (C-family languages)
    Block,
    /// `#` line comments between `# ---` rulers (shell-like languages)
    Hash,
    /// `--` line comments between `-- ---` rulers (sql, lua, haskell)
    DoubleDash,
    /// `<!-- -->` blocks (html, xml)
    Markup,
}

impl CommentStyle {
    /// Pick the style for a region's language tag.
    ///
    /// Untagged regions use docstrings. Tags without a known comment syntax
    /// (json, plain text, anything unlisted) get `None` and stay unannotated.
    pub fn for_language(language: Option<&str>) -> Option<Self> {
        let Some(language) = language else {
            return Some(Self::TripleQuote);
        };
        let style = match language.to_lowercase().as_str() {
            "python" | "py" | "python3" | "py3" | "ipython" => Self::TripleQuote,
            "c" | "h" | "cpp" | "c++" | "cc" | "hpp" | "cs" | "csharp" | "c#" | "java"
            | "kotlin" | "kt" | "scala" | "swift" | "go" | "rust" | "rs" | "js" | "jsx"
            | "javascript" | "ts" | "tsx" | "typescript" | "php" | "css" | "scss" | "less"
            | "dart" => Self::Block,
            "sh" | "bash" | "zsh" | "shell" | "console" | "ruby" | "rb" | "perl" | "pl" | "r"
            | "yaml" | "yml" | "toml" | "make" | "makefile" | "dockerfile" | "powershell"
            | "ps1" | "elixir" | "ex" => Self::Hash,
            "sql" | "plsql" | "mysql" | "postgresql" | "sqlite" | "lua" | "haskell" | "hs"
            | "elm" | "ada" => Self::DoubleDash,
            "html" | "htm" | "xhtml" | "xml" | "svg" => Self::Markup,
            _ => return None,
        };
        Some(style)
    }

    const fn open(self) -> &'static str {
        match self {
            Self::TripleQuote => "\"\"\"",
            Self::Block => "/*",
            Self::Hash => "# ---",
            Self::DoubleDash => "-- ---",
            Self::Markup => "<!--",
        }
    }

    const fn close(self) -> &'static str {
        match self {
            Self::TripleQuote => "\"\"\"",
            Self::Block => "*/",
            Self::Hash => "# ---",
            Self::DoubleDash => "-- ---",
            Self::Markup => "-->",
        }
    }

    const fn prefix(self) -> &'static str {
        match self {
            Self::TripleQuote | Self::Block | Self::Markup => "",
            Self::Hash => "#",
            Self::DoubleDash => "--",
        }
    }

    /// One comment block holding `sections` of `(label, text)`.
    fn block(self, sections: &[(&str, &str)]) -> String {
        let mut lines = vec![self.open().to_string()];
        for (index, (label, text)) in sections.iter().enumerate() {
            if index > 0 {
                lines.push(self.prefix().to_string());
            }
            lines.push(self.line(label));
            for text_line in self.sanitize(text).lines() {
                lines.push(self.line(text_line));
            }
        }
        lines.push(self.close().to_string());
        lines.join("\n")
    }

    fn line(self, text: &str) -> String {
        match self.prefix() {
            "" => text.to_string(),
            prefix if text.is_empty() => prefix.to_string(),
            prefix => format!("{prefix} {text}"),
        }
    }

    /// Drop sequences that would end the comment or the fence early.
    fn sanitize(self, text: &str) -> String {
        text.replace(self.close(), "").replace("```", "").trim().to_string()
    }

    /// Text of a comment line with the line prefix removed.
    fn content(self, line: &str) -> String {
        let trimmed = line.trim();
        match self.prefix() {
            "" => trimmed.to_string(),
            prefix => trimmed
                .strip_prefix(prefix)
                .unwrap_or(trimmed)
                .trim()
                .to_string(),
        }
    }

    fn is_label(self, line: &str) -> bool {
        let content = self.content(line);
        ANNOTATION_LABELS
            .iter()
            .any(|label| content.starts_with(label))
    }
}

/// Index of the last line of the annotation comment starting at `start`.
fn annotation_block_end(lines: &[&str], start: usize, style: CommentStyle) -> Option<usize> {
    let first = lines[start].trim();
    let rest = first.strip_prefix(style.open())?.trim();

    if rest.is_empty() {
        if !lines.get(start + 1).is_some_and(|next| style.is_label(next)) {
            return None;
        }
    } else {
        if !ANNOTATION_LABELS.iter().any(|label| rest.starts_with(label)) {
            return None;
        }
        if rest.len() > style.close().len() && rest.ends_with(style.close()) {
            return Some(start);
        }
    }

    (start + 1..lines.len()).find(|&index| {
        let line = lines[index].trim();
        line == style.close() || line.ends_with(style.close())
    })
}

/// Remove previously generated description/observation comments and the
/// blank lines surrounding the remaining code.
pub fn strip_annotations(code: &str, style: CommentStyle) -> String {
    let lines: Vec<&str> = code.lines().collect();
    let mut kept = Vec::with_capacity(lines.len());
    let mut index = 0;

    while index < lines.len() {
        if let Some(end) = annotation_block_end(&lines, index, style) {
            index = end + 1;
        } else {
            kept.push(lines[index]);
            index += 1;
        }
    }

    let first = kept.iter().position(|line| !line.trim().is_empty());
    let last = kept.iter().rposition(|line| !line.trim().is_empty());
    match (first, last) {
        (Some(first), Some(last)) => kept[first..=last].join("\n"),
        _ => String::new(),
    }
}

/// Post-processes generated text so that it holds at most one code region.
///
/// More than one region triggers a synthesis generation that asks the model
/// to merge them, repeated up to `max_synthesis_depth` times. Exactly one
/// region is re-emitted as a fenced block wrapped with a description and
/// observation header and a fixed footer. Text without regions is returned
/// unchanged.
pub struct ResponseNormalizer {
    client: Arc<GenerationClient>,
    config: NormalizerConfig,
    logger: Arc<dyn Logger>,
}

impl ResponseNormalizer {
    /// Normalizer synthesizing through `client`.
    pub fn new(
        client: Arc<GenerationClient>,
        config: NormalizerConfig,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            client,
            config,
            logger,
        }
    }

    /// Normalize `raw`, running synthesis calls with `policy`.
    pub async fn normalize(&self, raw: &str, policy: DecodingPolicy) -> NormalizedCodeResponse {
        let mut text = raw.to_string();
        let mut rounds = 0;

        loop {
            let mut regions = fence::scan(&text);
            self.logger
                .log(
                    Level::Info,
                    "code regions found",
                    fields([("count", json!(regions.len())), ("depth", json!(rounds))]),
                )
                .await;

            match regions.len() {
                0 => return self.finish(text, NormalizationKind::NoCode, rounds).await,
                1 => {
                    let region = regions.remove(0);
                    let wrapped = self.wrap(&region).await;
                    return self
                        .finish(wrapped, NormalizationKind::SingleRegion, rounds)
                        .await;
                }
                _ if rounds < self.config.max_synthesis_depth => {
                    rounds += 1;
                    match self.client.generate(&prompts::synthesis(&text), policy).await {
                        Generation::Text(synthesized) => text = synthesized,
                        Generation::Failed { last_error, .. } => {
                            self.logger
                                .log(
                                    Level::Error,
                                    "code synthesis failed",
                                    fields([("error", json!(last_error))]),
                                )
                                .await;
                            return self
                                .finish(text, NormalizationKind::Unresolved, rounds)
                                .await;
                        }
                    }
                }
                _ => return self.finish(text, NormalizationKind::Unresolved, rounds).await,
            }
        }
    }

    async fn finish(
        &self,
        text: String,
        kind: NormalizationKind,
        synthesis_rounds: u32,
    ) -> NormalizedCodeResponse {
        self.logger
            .log(
                Level::Info,
                "normalization finished",
                fields([
                    ("kind", json!(kind.to_string())),
                    ("synthesis_rounds", json!(synthesis_rounds)),
                ]),
            )
            .await;
        NormalizedCodeResponse {
            text,
            kind,
            synthesis_rounds,
        }
    }

    async fn wrap(&self, region: &CodeRegion) -> String {
        let Some(style) = CommentStyle::for_language(region.language.as_deref()) else {
            return fence::render(&region.body, region.language.as_deref(), region.fence_len);
        };
        let code = strip_annotations(&region.body, style);
        let (description, observation) = self.annotations(&code).await;

        let header = style.block(&[
            (DESCRIPTION_LABEL, &description),
            (OBSERVATION_LABEL, &observation),
        ]);
        let footer = style.block(&[(FOOTER_LABEL, FOOTER_TEXT)]);
        let body = format!("{header}\n{code}\n{footer}");

        fence::render(&body, region.language.as_deref(), region.fence_len)
    }

    async fn annotations(&self, code: &str) -> (String, String) {
        let fixed = (
            self.config.default_description.clone(),
            self.config.default_observation.clone(),
        );
        if self.config.annotation == AnnotationMode::Fixed || code.is_empty() {
            return fixed;
        }

        let description = self
            .client
            .generate(&prompts::describe_code(code), DecodingPolicy::ANNOTATION)
            .await;
        let observation = self
            .client
            .generate(&prompts::observe_code(code), DecodingPolicy::ANNOTATION)
            .await;

        (
            usable(&description).unwrap_or(fixed.0),
            usable(&observation).unwrap_or(fixed.1),
        )
    }
}

fn usable(generation: &Generation) -> Option<String> {
    generation
        .ok()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}
