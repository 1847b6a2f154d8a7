//! Instruction templates sent to the research agent.

use crate::contact::domain::Contact;
use crate::research::domain::ResearchQuery;
use minijinja::{Environment, context};
use thiserror::Error;

const PEOPLE_RESEARCH_TEMPLATE: &str = r#"
You are a research agent that finds professional contact details for people.

Find people relevant to this query: "{{ query }}"

Work through the following steps:
1. Search the web for people who match the query.
2. Open their personal, institutional or professional pages.
3. Record, only when it is publicly available:
   - full name
   - email address (only if publicly listed)
   - website or personal page
   - current affiliation
   - field of work or research
   - the URL where you found the details

Rules:
- Only record emails that are shown publicly; never go behind a login.
- Prefer current information and professional contexts.
- Skip social media profiles unless they carry professional details.

Reply with a JSON array of objects shaped like this:
[
  {
    "name": "Full Name",
    "email": "email@domain.edu",
    "website": "https://...",
    "affiliation": "Institution or company",
    "field": "Research area or role",
    "source_url": "https://where-you-found-this"
  }
]

Reply with JSON only. Every entry needs at least a name and an email. When
nothing suitable is found reply with []. A handful of accurate entries beats
a long list of weak ones.
"#;

const ENRICHMENT_TEMPLATE: &str = r#"
You are gathering context to personalise outreach to a known person.

Name: {{ name }}
Email: {{ email }}
Website: {{ website or "Not provided" }}

Visit their website or look for recent information about them and find:
- recent publications, projects or work
- current research interests or business focus
- recent news about them
- public statements about collaborations they are looking for

Reply with a JSON object only:
{
  "recent_work": "Short description of recent projects or publications",
  "interests": ["interest 1", "interest 2"],
  "context": "Anything useful for a personalised message",
  "last_updated": "When this information was published"
}
"#;

/// Error raised when an instruction template cannot be rendered.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("failed to render {template} instructions: {reason}")]
pub struct InstructionError {
    template: &'static str,
    reason: String,
}

/// Renders the people-research instructions for a query.
///
/// # Errors
///
/// Returns [`InstructionError`] when template rendering fails.
pub fn people_research_instructions(query: &ResearchQuery) -> Result<String, InstructionError> {
    render(
        "people research",
        PEOPLE_RESEARCH_TEMPLATE,
        context! { query => query.as_str() },
    )
}

/// Renders the enrichment instructions for an existing contact.
///
/// # Errors
///
/// Returns [`InstructionError`] when template rendering fails.
pub fn enrichment_instructions(contact: &Contact) -> Result<String, InstructionError> {
    render(
        "contact enrichment",
        ENRICHMENT_TEMPLATE,
        context! {
            name => contact.name().as_str(),
            email => contact.email().as_str(),
            website => contact.website(),
        },
    )
}

fn render(
    template: &'static str,
    source: &str,
    values: minijinja::Value,
) -> Result<String, InstructionError> {
    Environment::new()
        .render_str(source, values)
        .map_err(|err| InstructionError {
            template,
            reason: err.to_string(),
        })
}
