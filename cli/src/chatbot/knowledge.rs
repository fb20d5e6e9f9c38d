//! # Owner Knowledge Base
//!
//! File: cli/src/chatbot/knowledge.rs
//!
//! ## Overview
//!
//! The knowledge base is the immutable profile of the site owner that every
//! chatbot reply is rendered from. It is built once at startup, either from
//! the built-in profile (`KnowledgeBase::default()`) or from a TOML file, and
//! is then shared read-only (`Arc<KnowledgeBase>`) with the matcher and the
//! LLM relay.
//!
//! List-valued fields keep their stored order; templates join them verbatim.
//!
//! ## Examples
//!
//! ```toml
//! name = "Prajesh"
//! full_name = "Prajesh Dutta"
//! certifications = ["AWS Certified Solutions Architect", "..."]
//! codechef = "4-star rated (1870) with username: prajesh22"
//!
//! [education]
//! college = "B.Tech in Computer Science and Engineering at ..."
//! # ...
//! ```
//!
use crate::core::config::Config;
use crate::core::error::{FolioError, Result};
use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Profile of the site owner.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct KnowledgeBase {
    /// Short name used in replies ("Prajesh").
    pub name: String,
    /// Full name used when the bot introduces itself.
    pub full_name: String,
    /// Competitive-programming summary.
    pub codechef: String,
    /// Ordered; some replies quote entries by position.
    pub certifications: Vec<String>,
    // Tables last so the struct serializes to valid TOML.
    pub education: Education,
    pub skills: Skills,
    pub interests: Interests,
    pub activities: Activities,
    pub location: Location,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Education {
    pub college: String,
    pub high_school: String,
    pub secondary: String,
    pub drop_year: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Skills {
    pub programming: Vec<String>,
    pub cybersecurity: Vec<String>,
    pub cloud: Vec<String>,
    pub devops: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Interests {
    pub hobbies: Vec<String>,
    pub music: Music,
    pub movies: Movies,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Music {
    pub indian: Vec<String>,
    pub bengali: Vec<String>,
    pub western: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Movies {
    pub bollywood: Vec<String>,
    pub directors: Vec<String>,
    pub bengali: Vec<String>,
    pub other: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Activities {
    pub volunteer: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Location {
    pub current: String,
    pub hometown: String,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for KnowledgeBase {
    /// The built-in owner profile.
    fn default() -> Self {
        Self {
            name: "Prajesh".into(),
            full_name: "Prajesh Dutta".into(),
            education: Education {
                college: "B.Tech in Computer Science and Engineering at Vellore Institute of Technology (2022-2026)".into(),
                high_school: "Passed Class 12 from West Bengal Council of Higher Secondary Education Board (School: Arambagh High School) in 2022 with 92.6%".into(),
                secondary: "Passed Class 10 from West Bengal Board of Secondary Education (School: Arambagh High School) in 2020 with 87.3%".into(),
                drop_year: "Did not take any drop year".into(),
            },
            skills: Skills {
                programming: strings(&["Python", "Java", "Shell Scripting", "C/C++", "JavaScript"]),
                cybersecurity: strings(&[
                    "Penetration Testing",
                    "Web Security",
                    "Network Security",
                    "Wireshark",
                    "Burp Suite",
                    "Metasploit",
                    "Nmap",
                ]),
                cloud: strings(&["AWS", "Azure", "Google Cloud", "Oracle Cloud"]),
                devops: strings(&["Docker", "CI/CD", "Linux Administration"]),
            },
            interests: Interests {
                hobbies: strings(&["Swimming", "Carrom"]),
                music: Music {
                    indian: strings(&[
                        "Arijit Singh",
                        "Shreya Ghoshal",
                        "Mohammad Rafi",
                        "Kishore Kumar",
                        "Mukesh",
                        "Atif Aslam",
                        "Lata Mangeshkar",
                        "Asha Bhosle",
                        "Sandhya Mukherjee",
                    ]),
                    bengali: strings(&["Anupam Roy", "Rupam Islam"]),
                    western: strings(&["Linkin Park", "Ed Sheeran"]),
                },
                movies: Movies {
                    bollywood: strings(&["Shah Rukh Khan"]),
                    directors: strings(&["Christopher Nolan", "Satyajit Ray"]),
                    bengali: strings(&["Prosenjit Chatterjee"]),
                    other: strings(&["Folk dances and songs of Bengal"]),
                },
            },
            certifications: strings(&[
                "AWS Certified Solutions Architect",
                "Azure Developer Associate",
                "MongoDB Certified Associate Developer",
                "Azure AI Fundamentals",
                "Oracle Cloud Infrastructure Foundations",
                "GitHub Foundations",
                "Network Defense Essentials",
                "Ethical Hacking Essentials",
            ]),
            activities: Activities {
                volunteer: strings(&[
                    "Senior Core Committee Member at IEEE Computer Society - VIT Student Chapter",
                    "Junior Core Committee Member at VIT Blockchain Community",
                ]),
            },
            location: Location {
                current: "Vellore (for studies)".into(),
                hometown: "Kolkata, India".into(),
            },
            codechef: "4-star rated (1870) with username: prajesh22".into(),
        }
    }
}

impl KnowledgeBase {
    /// Reads and validates a knowledge base from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read knowledge file: {}", path.display()))?;
        let kb = Self::from_toml(&content)
            .with_context(|| format!("Invalid knowledge file: {}", path.display()))?;
        info!("Loaded knowledge base for '{}' from {}", kb.full_name, path.display());
        Ok(kb)
    }

    /// Parses and validates a knowledge base from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let kb: Self = toml::from_str(content).context("Failed to parse knowledge TOML")?;
        kb.validate()?;
        Ok(kb)
    }

    /// Serializes the knowledge base back to TOML (`folio kb show`).
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize knowledge base")
    }

    /// Rejects profiles the reply templates cannot be rendered from in a
    /// meaningful way. Positional certification lookups are checked later,
    /// when the templates are rendered.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(anyhow!(FolioError::KnowledgeBase(
                "'name' must not be empty".to_string()
            )));
        }
        if self.full_name.trim().is_empty() {
            return Err(anyhow!(FolioError::KnowledgeBase(
                "'full_name' must not be empty".to_string()
            )));
        }
        Ok(())
    }
}

/// Resolves the knowledge base named by the configuration, falling back to
/// the built-in profile.
pub fn load_from_config(config: &Config) -> Result<KnowledgeBase> {
    match &config.knowledge.file {
        Some(file) => KnowledgeBase::load(Path::new(file)),
        None => {
            debug!("No knowledge file configured, using the built-in profile.");
            Ok(KnowledgeBase::default())
        }
    }
}
