//! Sandbox Renderer — composes the three source fragments into an isolated
//! preview document.
//!
//! Every render builds a complete HTML document from scratch; nothing is
//! patched incrementally. That policy is what guarantees failure isolation:
//! a previous render's mutated DOM, timers, or globals cannot leak into the
//! next one, because the next one is a brand-new document in a brand-new
//! context.
//!
//! Runtime errors in the user script are trapped inside the document itself
//! (try/catch around the script plus a window-level error listener for
//! parse-stage failures) and reported as an inline banner appended to the
//! body — the rest of the markup stays visible, and nothing propagates to
//! the host.
//!
//! ## Example
//!
//! ```
//! use codepod::render::{Fragments, Renderer};
//!
//! let mut renderer = Renderer::new();
//! let rendering = renderer.render(&Fragments {
//!     markup: "<h1>Hi</h1>".into(),
//!     style: "h1 { color: teal; }".into(),
//!     script: "console.log('hi')".into(),
//! });
//! assert!(rendering.document.contains("<h1>Hi</h1>"));
//! ```

use serde::{Deserialize, Serialize};

use crate::snippet::Snippet;

/// The three independent source fragments of a snippet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragments {
    pub markup: String,
    pub style: String,
    pub script: String,
}

impl From<&Snippet> for Fragments {
    fn from(snippet: &Snippet) -> Self {
        Fragments {
            markup: snippet.markup.clone(),
            style: snippet.style.clone(),
            script: snippet.script.clone(),
        }
    }
}

/// Isolation boundary configuration for the embedding surface.
///
/// Script execution is allowed inside the rendered document's own scope;
/// top-level navigation, plugins, and scripting the hosting page are denied
/// by omission from the token list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SandboxPolicy {
    pub allow_scripts: bool,
    /// Same-origin resource access (relative asset loads in markup). Not
    /// otherwise needed.
    pub allow_same_origin: bool,
}

impl Default for SandboxPolicy {
    fn default() -> Self {
        SandboxPolicy {
            allow_scripts: true,
            allow_same_origin: true,
        }
    }
}

impl SandboxPolicy {
    /// The sandbox attribute value for an embedding iframe.
    pub fn attribute(&self) -> String {
        let mut tokens = Vec::new();
        if self.allow_scripts {
            tokens.push("allow-scripts");
        }
        if self.allow_same_origin {
            tokens.push("allow-same-origin");
        }
        tokens.join(" ")
    }
}

/// One rendered preview: a complete document plus the policy it must be
/// embedded under.
///
/// Renderings are totally ordered by `seq`; a newer rendering fully
/// supersedes an older one and the older context is discarded, never reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendering {
    pub seq: u64,
    pub document: String,
    pub policy: SandboxPolicy,
}

impl Rendering {
    /// Whether this rendering replaces `other` (started from newer state).
    pub fn supersedes(&self, other: &Rendering) -> bool {
        self.seq > other.seq
    }
}

/// Builds isolated preview documents, one fresh context per call.
///
/// Holds no fragment state between renders — only the sequence counter that
/// orders successive renderings.
#[derive(Debug, Default)]
pub struct Renderer {
    seq: u64,
    policy: SandboxPolicy,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: SandboxPolicy) -> Self {
        Renderer { seq: 0, policy }
    }

    /// Compose a fresh, fully-replaced rendering from the given fragments.
    ///
    /// Deterministic in the document content: identical fragments always
    /// produce an identical document. Performs no I/O and never touches the
    /// project store.
    pub fn render(&mut self, fragments: &Fragments) -> Rendering {
        self.seq += 1;
        tracing::debug!(seq = self.seq, "composing preview document");
        Rendering {
            seq: self.seq,
            document: compose_document(fragments),
            policy: self.policy,
        }
    }
}

/// Inline styling of the diagnostic banner appended on script errors.
const ERROR_BANNER_STYLE: &str =
    "color: red; background: #ffe6e6; padding: 10px; margin: 10px 0; border-radius: 4px;";

/// Build the complete preview document.
///
/// Layout: document skeleton, one embedded stylesheet (base body rules plus
/// the user style), the user markup as body content, then one embedded
/// program that installs a window error listener and runs the user script
/// inside try/catch. Both failure paths append the same diagnostic banner
/// to the body, so the markup above it stays visible and interactive.
pub fn compose_document(fragments: &Fragments) -> String {
    let style = neutralize_closer(&fragments.style, "style");
    let script = neutralize_closer(&fragments.script, "script");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Preview</title>
  <style>
    body {{
      margin: 0;
      padding: 16px;
      font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Roboto', sans-serif;
    }}
    {style}
  </style>
</head>
<body>
{markup}
<script>
  function __codepodReportError(message) {{
    var banner = document.createElement('div');
    banner.setAttribute('style', '{banner_style}');
    banner.innerHTML = '<strong>JavaScript Error:</strong> ';
    banner.appendChild(document.createTextNode(message));
    document.body.appendChild(banner);
  }}
  window.addEventListener('error', function (e) {{
    console.error('Preview Error:', e.error);
    __codepodReportError(e.message);
  }});
  try {{
    {script}
  }} catch (error) {{
    console.error('JavaScript execution error:', error);
    __codepodReportError(error.message);
  }}
</script>
</body>
</html>
"#,
        style = style,
        markup = fragments.markup,
        banner_style = ERROR_BANNER_STYLE,
        script = script,
    )
}

/// Rewrite literal `</tag` sequences so user text cannot terminate the
/// element it is embedded in. Case-insensitive; the replacement stays valid
/// inside JS strings and is inert in CSS.
fn neutralize_closer(text: &str, tag: &str) -> String {
    let needle = format!("</{}", tag);
    // Byte-wise comparison: the needle is pure ASCII, so a match can only
    // start and end on char boundaries even in multibyte input.
    let bytes = text.as_bytes();
    let needle_bytes = needle.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes.len() - i >= needle_bytes.len()
            && bytes[i..i + needle_bytes.len()].eq_ignore_ascii_case(needle_bytes)
        {
            out.push_str("<\\/");
            out.push_str(&text[i + 2..i + needle_bytes.len()]);
            i += needle_bytes.len();
        } else {
            let ch_len = text[i..].chars().next().map(char::len_utf8).unwrap_or(1);
            out.push_str(&text[i..i + ch_len]);
            i += ch_len;
        }
    }
    out
}
