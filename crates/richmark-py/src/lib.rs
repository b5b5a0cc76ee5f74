//! Python bindings for the richmark converter.

use richmark_core::{
    error::Diagnostic as CoreDiagnostic, span::Span as CoreSpan, ConvertOptions,
    ConvertResult as CoreConvertResult, Converter as CoreConverter, RichTextItem as CoreItem,
    DEFAULT_MAX_DEPTH,
};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

// ============================================================================
// Span
// ============================================================================

/// Byte range in the normalized input.
#[pyclass(frozen, get_all, name = "Span")]
#[derive(Clone)]
pub struct PySpan {
    pub start: u32,
    pub end: u32,
}

#[pymethods]
impl PySpan {
    fn __repr__(&self) -> String {
        format!("Span({}, {})", self.start, self.end)
    }

    #[getter]
    fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }
}

impl From<CoreSpan> for PySpan {
    fn from(s: CoreSpan) -> Self {
        PySpan {
            start: s.start,
            end: s.end,
        }
    }
}

// ============================================================================
// Diagnostic
// ============================================================================

/// Markup the converter kept as literal text.
#[pyclass(frozen, get_all, name = "Diagnostic")]
#[derive(Clone)]
pub struct PyDiagnostic {
    /// One of `invalid_link_target`, `unterminated_link_target`,
    /// `malformed_link_title`, `blank_span`, `nesting_too_deep`.
    pub kind: String,
    pub message: String,
    pub span: Option<PySpan>,
}

#[pymethods]
impl PyDiagnostic {
    fn __repr__(&self) -> String {
        format!("Diagnostic({:?}, {:?})", self.kind, self.message)
    }

    fn __str__(&self) -> String {
        match &self.span {
            Some(s) => format!("{} at bytes {}..{}", self.message, s.start, s.end),
            None => self.message.clone(),
        }
    }
}

impl From<&CoreDiagnostic> for PyDiagnostic {
    fn from(d: &CoreDiagnostic) -> Self {
        PyDiagnostic {
            kind: d.kind.as_str().to_string(),
            message: d.message.clone(),
            span: d.span.map(PySpan::from),
        }
    }
}

// ============================================================================
// RichTextItem
// ============================================================================

/// One run of text with its link and formatting flags.
#[pyclass(frozen, get_all, name = "RichTextItem")]
#[derive(Clone)]
pub struct PyRichTextItem {
    pub content: String,
    pub link: Option<String>,
    /// Names of the flags that are set, in wire order.
    pub annotations: Vec<String>,
}

#[pymethods]
impl PyRichTextItem {
    /// The item as a dict in the document API's wire shape.
    fn to_dict<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let text = PyDict::new(py);
        text.set_item("content", &self.content)?;
        if let Some(url) = &self.link {
            let link = PyDict::new(py);
            link.set_item("url", url)?;
            text.set_item("link", link)?;
        }

        let dict = PyDict::new(py);
        dict.set_item("type", "text")?;
        dict.set_item("text", text)?;
        if !self.annotations.is_empty() {
            let annotations = PyDict::new(py);
            for flag in &self.annotations {
                annotations.set_item(flag, true)?;
            }
            dict.set_item("annotations", annotations)?;
        }
        Ok(dict)
    }

    fn __repr__(&self) -> String {
        format!(
            "RichTextItem({:?}, link={:?}, annotations={:?})",
            self.content, self.link, self.annotations
        )
    }
}

impl From<&CoreItem> for PyRichTextItem {
    fn from(item: &CoreItem) -> Self {
        PyRichTextItem {
            content: item.content().to_string(),
            link: item.link().map(str::to_string),
            annotations: item.flags().iter().map(|f| f.as_str().to_string()).collect(),
        }
    }
}

// ============================================================================
// ConvertResult
// ============================================================================

/// Converted items plus the diagnostics recorded on the way.
#[pyclass(frozen, name = "ConvertResult")]
pub struct PyConvertResult {
    /// `None` for blank input when blanks are not allowed.
    #[pyo3(get)]
    pub items: Option<Vec<PyRichTextItem>>,
    #[pyo3(get)]
    pub diagnostics: Vec<PyDiagnostic>,
}

#[pymethods]
impl PyConvertResult {
    #[getter]
    fn clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    fn __repr__(&self) -> String {
        let items = match &self.items {
            Some(items) => items.len().to_string(),
            None => "None".to_string(),
        };
        format!(
            "ConvertResult(items={}, diagnostics={})",
            items,
            self.diagnostics.len()
        )
    }
}

impl From<CoreConvertResult> for PyConvertResult {
    fn from(result: CoreConvertResult) -> Self {
        PyConvertResult {
            items: result
                .items
                .map(|items| items.iter().map(PyRichTextItem::from).collect()),
            diagnostics: result.diagnostics.iter().map(PyDiagnostic::from).collect(),
        }
    }
}

// ============================================================================
// Converter
// ============================================================================

/// Inline markdown to rich-text converter.
///
/// Args:
///     allow_blank: Return an empty list for blank input instead of None
///     max_depth: Nesting cap for recursive spans (default 64)
#[pyclass(frozen, name = "Converter")]
pub struct PyConverter {
    inner: CoreConverter,
}

#[pymethods]
impl PyConverter {
    #[new]
    #[pyo3(
        signature = (allow_blank=false, max_depth=DEFAULT_MAX_DEPTH),
        text_signature = "(allow_blank=False, max_depth=64)"
    )]
    fn new(allow_blank: bool, max_depth: usize) -> Self {
        let options = ConvertOptions::new()
            .with_allow_blank(allow_blank)
            .with_max_depth(max_depth);
        PyConverter {
            inner: CoreConverter::new(options),
        }
    }

    #[getter]
    fn allow_blank(&self) -> bool {
        self.inner.options().allow_blank
    }

    #[getter]
    fn max_depth(&self) -> usize {
        self.inner.options().max_depth
    }

    /// Convert a markdown string. Returns None for blank input unless
    /// `allow_blank` is set.
    #[pyo3(signature = (markdown=None), text_signature = "(self, markdown=None)")]
    fn convert(&self, markdown: Option<&str>) -> Option<Vec<PyRichTextItem>> {
        self.inner
            .convert(markdown)
            .map(|items| items.iter().map(PyRichTextItem::from).collect())
    }

    /// Convert and also report markup that stayed literal.
    #[pyo3(signature = (markdown=None), text_signature = "(self, markdown=None)")]
    fn convert_with_diagnostics(&self, markdown: Option<&str>) -> PyConvertResult {
        self.inner.convert_with_diagnostics(markdown).into()
    }

    fn __repr__(&self) -> String {
        let options = self.inner.options();
        format!(
            "Converter(allow_blank={}, max_depth={})",
            if options.allow_blank { "True" } else { "False" },
            options.max_depth
        )
    }
}

// ============================================================================
// Module functions
// ============================================================================

/// Convert inline markdown into rich-text dicts.
///
/// Args:
///     markdown: Source text, or None
///     allow_blank: Return [] for blank input instead of None
///     max_depth: Nesting cap for recursive spans (default 64)
///
/// Returns:
///     list[dict] | None: Items in the document API's wire shape
#[pyfunction]
#[pyo3(
    signature = (markdown=None, allow_blank=false, max_depth=DEFAULT_MAX_DEPTH),
    text_signature = "(markdown=None, allow_blank=False, max_depth=64)"
)]
fn markdown_to_rich_text<'py>(
    py: Python<'py>,
    markdown: Option<&str>,
    allow_blank: bool,
    max_depth: usize,
) -> PyResult<Option<Bound<'py, PyList>>> {
    let converter = PyConverter::new(allow_blank, max_depth);
    let Some(items) = converter.inner.convert(markdown) else {
        return Ok(None);
    };

    let list = PyList::empty(py);
    for item in &items {
        list.append(PyRichTextItem::from(item).to_dict(py)?)?;
    }
    Ok(Some(list))
}

// ============================================================================
// Module
// ============================================================================

/// richmark - Inline markdown to annotated rich text.
#[pymodule]
fn pyrichmark(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PySpan>()?;
    m.add_class::<PyDiagnostic>()?;
    m.add_class::<PyRichTextItem>()?;
    m.add_class::<PyConvertResult>()?;
    m.add_class::<PyConverter>()?;
    m.add_function(wrap_pyfunction!(markdown_to_rich_text, m)?)?;
    m.add("DEFAULT_MAX_DEPTH", DEFAULT_MAX_DEPTH)?;
    Ok(())
}
