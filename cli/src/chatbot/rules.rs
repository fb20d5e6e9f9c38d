//! # Topic Rule Table
//!
//! File: cli/src/chatbot/rules.rs
//!
//! ## Overview
//!
//! The chatbot's behaviour is data: an ordered table of topic rules, each a
//! case-insensitive regex predicate plus a Tera reply template, preceded by a
//! blocked-topic guard and followed by a catch-all fallback.
//!
//! ## Ordering
//!
//! Order is significant. The first rule whose pattern occurs anywhere in the
//! message answers it, regardless of where the keyword sits in the message.
//! Broad rules (`skills`) precede narrower ones (`cybersecurity`, `cloud`),
//! so "tell me about your cybersecurity skills" gets the `skills` reply. The
//! order is kept exactly as it is; it is not a relevance ranking.
//!
//! | # | topic          |
//! |---|----------------|
//! | 1 | greeting       |
//! | 2 | name           |
//! | 3 | education      |
//! | 4 | skills         |
//! | 5 | programming    |
//! | 6 | cybersecurity  |
//! | 7 | cloud          |
//! | 8 | certifications |
//! | 9 | hobbies        |
//! |10 | music          |
//! |11 | movies         |
//! |12 | codechef       |
//! |13 | location       |
//! |14 | contact        |
//! |15 | activities     |
//! |   | fallback       |
//!
//! Patterns are plain substring alternations, so short keywords match inside
//! longer words ("class" in "classical", "from" in "where are you from").
//!
use crate::core::error::{FolioError, Result};
use regex::{Regex, RegexBuilder};

/// Topic key of the catch-all rule. Reserved: a table entry may not use it.
pub const FALLBACK_TOPIC: &str = "fallback";

/// Template name of the refusal returned for blocked topics.
pub const REFUSAL_TEMPLATE_NAME: &str = "refusal";

/// One row of the rule table, before compilation.
#[derive(Debug, Clone, Copy)]
pub struct RuleSpec {
    /// Topic key reported by `folio ask --explain` and `folio kb rules`.
    pub topic: &'static str,
    /// Regex source, matched case-insensitively anywhere in the message.
    pub pattern: &'static str,
    /// Tera template rendered against the knowledge base.
    pub template: &'static str,
}

/// Requests for private data and political, religious or otherwise
/// controversial subjects. Checked before every topic rule.
pub const BLOCKED_PATTERN: &str = "(password|private|credit card|address|phone number|identity|politics|religion|controversial|offensive|inappropriate|gossip|rumor)";

/// Reply to blocked messages. Rendered against the knowledge base like the
/// topic templates.
pub const REFUSAL_TEMPLATE: &str = "I'm {{ name }}'s portfolio assistant. I'm only able to answer questions about {{ name }}'s professional background, education, skills, and interests. Is there something specific about {{ name }} you'd like to know?";

pub const FALLBACK_TEMPLATE: &str = "I'm not sure I understand that question. I can tell you about {{ name }}'s education, skills, certifications, interests, or how to contact him. What would you like to know?";

/// The topic rules, in evaluation order.
pub const TOPIC_RULES: &[RuleSpec] = &[
    RuleSpec {
        topic: "greeting",
        pattern: "^(hi|hello|hey|greetings|howdy|what's up)",
        template: "Hello! I'm {{ name }}'s AI assistant. I can tell you about his education, skills, interests, or certifications. How can I help you learn more about {{ name }}?",
    },
    RuleSpec {
        topic: "name",
        pattern: "(who are you|your name|chatbot name)",
        template: "I'm a chatbot assistant for {{ full_name }}'s portfolio website. I can help answer questions about {{ name }}, his skills, education, and interests.",
    },
    RuleSpec {
        topic: "education",
        pattern: "(education|college|university|school|study|studying|studied|degree|class|12th|10th)",
        template: "{{ name }} is currently pursuing {{ education.college }}. He {{ education.high_school }} and {{ education.secondary }}. {{ education.drop_year }}.",
    },
    RuleSpec {
        topic: "skills",
        pattern: "(skills|good at|expertise|expert in|proficient|abilities|capable|talent)",
        template: concat!(
            "{{ name }} has expertise in various technical areas, including:\n",
            r#"1. Programming: {{ skills.programming | join(sep=", ") }}"#, "\n",
            r#"2. Cybersecurity: {{ skills.cybersecurity | join(sep=", ") }}"#, "\n",
            r#"3. Cloud Technologies: {{ skills.cloud | join(sep=", ") }}"#, "\n",
            r#"4. DevOps: {{ skills.devops | join(sep=", ") }}"#, "\n",
            "\n",
            "He's particularly passionate about cybersecurity and cloud technologies."
        ),
    },
    RuleSpec {
        topic: "programming",
        pattern: "(programming|coding|development|developer|code|languages)",
        template: r#"{{ name }} is proficient in several programming languages including {{ skills.programming | join(sep=", ") }}. He has used these skills in various projects and academic work."#,
    },
    RuleSpec {
        topic: "cybersecurity",
        pattern: "(cybersecurity|security|hacking|penetration testing|ethical hacking|network security|web security)",
        template: r#"{{ name }} is passionate about cybersecurity, with expertise in {{ skills.cybersecurity | join(sep=", ") }}. He has certifications like {{ certifications.6 }} and {{ certifications.7 }}."#,
    },
    RuleSpec {
        topic: "cloud",
        pattern: "(cloud|aws|azure|google cloud|oracle)",
        template: r#"{{ name }} has experience with cloud platforms including {{ skills.cloud | join(sep=", ") }}. He holds certifications like {{ certifications.0 }}, {{ certifications.1 }}, and {{ certifications.4 }}."#,
    },
    RuleSpec {
        topic: "certifications",
        pattern: "(certifications|certificates|certified|qualify|qualification)",
        template: "{{ name }} holds several professional certifications including:{% for cert in certifications %}\n- {{ cert }}{% endfor %}",
    },
    RuleSpec {
        topic: "hobbies",
        pattern: "(hobbies|interests|like to do|free time|leisure|enjoy)",
        template: r#"Outside of technology, {{ name }} enjoys {{ interests.hobbies | join(sep=" and ") }}. He's also passionate about music and movies."#,
    },
    RuleSpec {
        topic: "music",
        pattern: "(music|songs|singers|artists|listen|band)",
        template: concat!(
            "{{ name }} loves Indian classical music and enjoys listening to:\n",
            r#"- Indian singers: {{ interests.music.indian | join(sep=", ") }}"#, "\n",
            r#"- Bengali singers: {{ interests.music.bengali | join(sep=", ") }}"#, "\n",
            r#"- Western artists: {{ interests.music.western | join(sep=", ") }}"#, "\n",
            "\n",
            "He also enjoys Bengali folk songs."
        ),
    },
    RuleSpec {
        topic: "movies",
        pattern: "(movies|film|actor|actress|cinema|director)",
        template: r#"{{ name }} enjoys films by directors like {{ interests.movies.directors | join(sep=" and ") }}. He loves movies starring {{ interests.movies.bollywood.0 }} in Bollywood and {{ interests.movies.bengali.0 }} in Bengali cinema. He also appreciates {{ interests.movies.other.0 }}."#,
    },
    RuleSpec {
        topic: "codechef",
        pattern: "(codechef|competitive programming|programming contest|coding competition)",
        template: "{{ name }} is {{ codechef }}. He actively participates in competitive programming contests.",
    },
    RuleSpec {
        topic: "location",
        pattern: "(location|live|living|city|town|from|where|place)",
        template: "{{ name }} is currently in {{ location.current }}. His hometown is {{ location.hometown }}.",
    },
    RuleSpec {
        topic: "contact",
        pattern: "(contact|email|reach|get in touch|connect)",
        template: "You can reach out to {{ name }} through the contact form on this website. Just scroll down to the Contact section and fill out the form!",
    },
    RuleSpec {
        topic: "activities",
        pattern: "(activities|volunteering|volunteer|committee|organization|club)",
        template: "{{ name }} is involved in several activities including:{% for item in activities.volunteer %}\n{{ item }}{% endfor %}",
    },
];

/// # Compile Pattern (`compile_pattern`)
///
/// Compiles one rule pattern into a case-insensitive, unanchored regex. A
/// pattern that needs anchoring says so itself (the greeting rule uses `^`).
///
/// ## Arguments
///
/// * `pattern`: Regex source from the rule table or `BLOCKED_PATTERN`.
///
/// ## Returns
///
/// * `Result<Regex>`: The compiled predicate.
///
/// ## Errors
///
/// Returns `FolioError::Pattern` if the source is not a valid regex.
pub fn compile_pattern(pattern: &str) -> Result<Regex> {
    let regex = RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(FolioError::from)?;
    Ok(regex)
}
