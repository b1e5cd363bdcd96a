//! Intent detection using an ordered keyword table.
//!
//! Fast rule-based topic detection, no ML model required. Keyword sets
//! overlap across intents (e.g., "report" appears in both phishing and
//! incident contexts), so the table is an explicit ordered list and the
//! first intent with a hit wins. The order is part of the contract.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::text::normalize;

/// Detected security-awareness topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Greeting (hello, hi, good morning, etc.)
    Greeting,
    /// Suspicious email / phishing incident
    PhishingIncident,
    /// Password strength, resets, lockouts
    PasswordSecurity,
    /// Multi-factor authentication
    Mfa,
    /// VPN and remote access
    Vpn,
    /// Patches and software updates
    Updates,
    /// Handling and sharing sensitive data
    DataSensitivity,
    /// Reporting a security incident
    IncidentReporting,
    /// Fallback when no keyword matches
    Unknown,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Intent {
    /// Returns the stable text label for the intent.
    pub fn label(&self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::PhishingIncident => "phishing_incident",
            Intent::PasswordSecurity => "password_security",
            Intent::Mfa => "mfa",
            Intent::Vpn => "vpn",
            Intent::Updates => "updates",
            Intent::DataSensitivity => "data_sensitivity",
            Intent::IncidentReporting => "incident_reporting",
            Intent::Unknown => "unknown",
        }
    }
}

/// Keyword table in priority order. First match wins, so broader phrases
/// (like "report") deliberately sit in later rows than specific topics.
/// Keywords are matched as whole-word phrases against normalized text.
const INTENT_KEYWORDS: &[(Intent, &[&str])] = &[
    (
        Intent::Greeting,
        &["hello", "hi", "hey", "good morning", "good afternoon", "good evening", "greetings"],
    ),
    (
        Intent::PhishingIncident,
        &[
            "phishing",
            "suspicious email",
            "suspicious link",
            "suspect email",
            "strange email",
            "weird email",
            "clicked a link",
            "clicked on a link",
            "scam",
            "fraud",
            "fraudulent",
            "spoofed",
            "spoofing",
        ],
    ),
    (
        Intent::PasswordSecurity,
        &[
            "password",
            "passwords",
            "passphrase",
            "credentials",
            "locked out",
            "account locked",
            "reset",
            "password manager",
        ],
    ),
    (
        Intent::Mfa,
        &[
            "mfa",
            "2fa",
            "two factor",
            "multi factor",
            "multifactor",
            "authenticator",
            "one time code",
            "otp",
            "verification code",
        ],
    ),
    (
        Intent::Vpn,
        &[
            "vpn",
            "remote access",
            "public wifi",
            "tunnel",
            "working remotely",
            "remote work",
            "work from home",
        ],
    ),
    (
        Intent::Updates,
        &["update", "updates", "patch", "patches", "patching", "upgrade", "security fix"],
    ),
    (
        Intent::DataSensitivity,
        &[
            "sensitive data",
            "confidential",
            "gdpr",
            "personal data",
            "share a file",
            "sharing files",
            "data sharing",
            "classified",
        ],
    ),
    (
        Intent::IncidentReporting,
        &[
            "incident",
            "report",
            "compromised",
            "breach",
            "attack",
            "security team",
            "escalate",
            "urgent",
        ],
    ),
];

/// Rule-based intent detector.
///
/// A pure function of the input text and the configured keyword table;
/// no side effects, safe to share across requests.
pub struct IntentDetector {
    table: &'static [(Intent, &'static [&'static str])],
}

impl Default for IntentDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentDetector {
    /// Create a detector over the built-in keyword table.
    pub fn new() -> Self {
        Self { table: INTENT_KEYWORDS }
    }

    /// Detect the intent of a message. Empty or unmatched input resolves
    /// to `Intent::Unknown`; every input resolves to exactly one label.
    pub fn detect(&self, text: &str) -> Intent {
        let normalized = normalize(text);
        if normalized.is_empty() {
            return Intent::Unknown;
        }
        // Pad with spaces so single-word keywords match on word boundaries
        // and multi-word phrases match across them.
        let padded = format!(" {} ", normalized);

        for (intent, keywords) in self.table {
            for keyword in keywords.iter() {
                if padded.contains(&format!(" {} ", keyword)) {
                    return *intent;
                }
            }
        }

        Intent::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_intent_primary_keyword() {
        let detector = IntentDetector::new();

        assert_eq!(detector.detect("hello"), Intent::Greeting);
        assert_eq!(detector.detect("phishing"), Intent::PhishingIncident);
        assert_eq!(detector.detect("password"), Intent::PasswordSecurity);
        assert_eq!(detector.detect("mfa"), Intent::Mfa);
        assert_eq!(detector.detect("vpn"), Intent::Vpn);
        assert_eq!(detector.detect("update"), Intent::Updates);
        assert_eq!(detector.detect("sensitive data"), Intent::DataSensitivity);
        assert_eq!(detector.detect("incident"), Intent::IncidentReporting);
    }

    #[test]
    fn test_unknown_fallback() {
        let detector = IntentDetector::new();

        assert_eq!(detector.detect(""), Intent::Unknown);
        assert_eq!(detector.detect("   "), Intent::Unknown);
        assert_eq!(detector.detect("asdkjasdk random text"), Intent::Unknown);
    }

    #[test]
    fn test_normalization_before_matching() {
        let detector = IntentDetector::new();

        assert_eq!(detector.detect("PHISHING!!!"), Intent::PhishingIncident);
        assert_eq!(detector.detect("  how   do i enable MFA?  "), Intent::Mfa);
        assert_eq!(detector.detect("Hello, there"), Intent::Greeting);
    }

    #[test]
    fn test_first_match_wins_on_overlap() {
        let detector = IntentDetector::new();

        // "report" belongs to incident_reporting but "phishing" sits earlier
        // in the table, so the phishing intent wins.
        assert_eq!(
            detector.detect("how do i report a phishing email"),
            Intent::PhishingIncident
        );
        // Without the phishing keyword, "report" resolves normally.
        assert_eq!(detector.detect("i want to report something"), Intent::IncidentReporting);
    }

    #[test]
    fn test_word_boundary_matching() {
        let detector = IntentDetector::new();

        // "hi" must not match inside "hijacked".
        assert_ne!(detector.detect("my session was hijacked"), Intent::Greeting);
        // "otp" must not match inside "laptop".
        assert_ne!(detector.detect("my laptop is slow"), Intent::Mfa);
    }

    #[test]
    fn test_phishing_scenario() {
        let detector = IntentDetector::new();

        assert_eq!(
            detector.detect("I think I got a phishing email, what do I do"),
            Intent::PhishingIncident
        );
    }
}
