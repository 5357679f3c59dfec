//! HTML and plain-text rendering of resolution results.

use crate::models::ResolutionResult;
use crate::resolver::ResolveError;

const TITLE: &str = "Molecule Information Finder";
const EXAMPLE_SMILES: &str = "CC(=O)OC1=CC=CC=C1C(=O)O";
const NO_DATABASE_DATA: &str = "No PubChem data found. Try a different SMILES.";

const STYLE: &str = "body{font-family:sans-serif;max-width:48rem;margin:2rem auto;padding:0 1rem}\
.banner{padding:.75rem 1rem;border-radius:.25rem;margin:1rem 0}\
.success{background:#e6f4ea;color:#1e4620}\
.error{background:#fdecea;color:#611a15}\
.warning{background:#fff4e5;color:#663c00}\
code{background:#f3f3f3;padding:0 .25rem}";

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Render the lookup page.
///
/// `outcome` is `None` before anything was submitted. An invalid structure is
/// shown as an error banner above the form, not as an HTTP error.
pub fn render_page(input: &str, outcome: Option<&Result<ResolutionResult, ResolveError>>) -> String {
    let mut body = String::new();

    body.push_str(&format!("<h1>{}</h1>\n", TITLE));
    body.push_str(
        "<p>Enter a <strong>SMILES</strong> string to retrieve molecular properties, \
         Wikipedia summary, and PubChem data.</p>\n",
    );
    body.push_str(&format!(
        "<p>Example: Aspirin - <code>{}</code></p>\n",
        escape_html(EXAMPLE_SMILES)
    ));
    body.push_str(&format!(
        "<form method=\"get\" action=\"/\">\n\
         <label for=\"smiles\">Enter SMILES structure</label>\n\
         <input id=\"smiles\" name=\"smiles\" type=\"text\" value=\"{}\">\n\
         <button type=\"submit\">Look up</button>\n\
         </form>\n",
        escape_html(input)
    ));

    match outcome {
        None => {}
        Some(Err(e)) => banner(&mut body, "error", &e.to_string()),
        Some(Ok(result)) => {
            banner(&mut body, "success", "Results retrieved successfully!");
            render_result(&mut body, result);
        }
    }

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{}</body>\n</html>\n",
        TITLE, STYLE, body
    )
}

fn banner(body: &mut String, kind: &str, message: &str) {
    body.push_str(&format!(
        "<div class=\"banner {}\">{}</div>\n",
        kind,
        escape_html(message)
    ));
}

fn field(body: &mut String, label: &str, value: &str) {
    body.push_str(&format!(
        "<p><strong>{}:</strong> {}</p>\n",
        label,
        escape_html(value)
    ));
}

fn link(body: &mut String, url: &str, text: &str) {
    body.push_str(&format!(
        "<p><a href=\"{}\">{}</a></p>\n",
        escape_html(url),
        text
    ));
}

fn render_result(body: &mut String, result: &ResolutionResult) {
    body.push_str("<h2>Molecular Properties</h2>\n");
    field(body, "Molecular Weight", &result.descriptors.formatted_weight());
    field(body, "logP", &result.descriptors.formatted_logp());

    body.push_str("<h2>Wikipedia Summary</h2>\n");
    body.push_str(&format!(
        "<p>{}</p>\n",
        escape_html(&result.encyclopedia.summary)
    ));
    if let Some(url) = &result.encyclopedia.page_url {
        link(body, url, "View on Wikipedia");
    }

    body.push_str("<h2>PubChem Data</h2>\n");
    match &result.database {
        Some(entry) => {
            field(body, "Molecular Formula", &entry.molecular_formula);
            field(body, "Molecular Weight", &entry.molecular_weight);
            field(body, "IUPAC Name", &entry.iupac_name);
            field(body, "Canonical SMILES", &entry.canonical_smiles);
            link(body, &entry.record_url, "View on PubChem");
        }
        None => banner(body, "warning", NO_DATABASE_DATA),
    }
}

/// Plain-text report for the terminal.
pub fn render_text(result: &ResolutionResult) -> String {
    let mut output = String::new();

    output.push_str(&format!("SMILES: {}\n\n", result.input));

    output.push_str("Molecular Properties\n");
    output.push_str(&format!(
        "  Molecular Weight: {}\n",
        result.descriptors.formatted_weight()
    ));
    output.push_str(&format!("  logP: {}\n\n", result.descriptors.formatted_logp()));

    output.push_str("Wikipedia Summary\n");
    output.push_str(&format!("  {}\n", result.encyclopedia.summary));
    if let Some(url) = &result.encyclopedia.page_url {
        output.push_str(&format!("  {}\n", url));
    }
    output.push('\n');

    output.push_str("PubChem Data\n");
    match &result.database {
        Some(entry) => {
            output.push_str(&format!("  Molecular Formula: {}\n", entry.molecular_formula));
            output.push_str(&format!("  Molecular Weight: {}\n", entry.molecular_weight));
            output.push_str(&format!("  IUPAC Name: {}\n", entry.iupac_name));
            output.push_str(&format!("  Canonical SMILES: {}\n", entry.canonical_smiles));
            output.push_str(&format!("  {}\n", entry.record_url));
        }
        None => output.push_str(&format!("  {}\n", NO_DATABASE_DATA)),
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DatabaseEntry, DescriptorSet, EncyclopediaEntry};

    fn aspirin(database: Option<DatabaseEntry>) -> ResolutionResult {
        ResolutionResult {
            input: EXAMPLE_SMILES.to_string(),
            descriptors: DescriptorSet {
                molecular_weight: 180.159,
                logp: 1.3101,
            },
            encyclopedia: EncyclopediaEntry {
                summary: "Aspirin <b>is</b> a drug.".to_string(),
                page_url: Some("https://en.wikipedia.org/wiki/Aspirin".to_string()),
                resolved_query_name: Some("2-acetyloxybenzoic acid".to_string()),
            },
            database,
        }
    }

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn empty_page_has_form_and_example() {
        let html = render_page("", None);
        assert!(html.contains(TITLE));
        assert!(html.contains("name=\"smiles\""));
        assert!(html.contains(EXAMPLE_SMILES));
        assert!(!html.contains("banner"));
    }

    #[test]
    fn page_escapes_interpolated_text() {
        let html = render_page(EXAMPLE_SMILES, Some(&Ok(aspirin(None))));
        assert!(html.contains("Aspirin &lt;b&gt;is&lt;/b&gt; a drug."));
        assert!(!html.contains("<b>is</b>"));
    }

    #[test]
    fn missing_database_entry_shows_warning() {
        let html = render_page(EXAMPLE_SMILES, Some(&Ok(aspirin(None))));
        assert!(html.contains("Results retrieved successfully!"));
        assert!(html.contains(NO_DATABASE_DATA));
        assert!(html.contains("View on Wikipedia"));
    }

    #[test]
    fn text_report_lists_database_fields() {
        let entry = DatabaseEntry {
            cid: 2244,
            molecular_formula: "C9H8O4".to_string(),
            molecular_weight: "180.16 g/mol".to_string(),
            iupac_name: "2-acetyloxybenzoic acid".to_string(),
            canonical_smiles: EXAMPLE_SMILES.to_string(),
            record_url: "https://pubchem.ncbi.nlm.nih.gov/compound/2244".to_string(),
        };
        let text = render_text(&aspirin(Some(entry)));
        assert!(text.contains("Molecular Weight: 180.16 g/mol"));
        assert!(text.contains("logP: 1.31"));
        assert!(text.contains("Molecular Formula: C9H8O4"));
        assert!(text.contains("https://pubchem.ncbi.nlm.nih.gov/compound/2244"));
    }
}
