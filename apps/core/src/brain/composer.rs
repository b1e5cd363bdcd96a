//! Reply composition.
//!
//! Merges the detected intent, the ranked semantic matches and a random
//! security tip into the final structured reply. All fallback decisions
//! (confidence threshold, generic per-intent templates, default reply)
//! live here so the caller never branches on exceptional control flow for
//! a normal "I don't know" case.

use rand::Rng;

use crate::knowledge::KnowledgeBase;
use crate::models::{ComposedReply, Suggestion};

use super::intent::Intent;
use super::semantic::MatchResult;

/// Fallback tip used when the knowledge base ships no tips.
const DEFAULT_TIP: &str =
    "Enable multi-factor authentication and never reuse passwords across accounts.";

/// Follow-up question attached to phishing replies. Static text only: the
/// assistant does not track multi-turn state.
const PHISHING_FOLLOW_UP: &str =
    "Did you enter credentials or download an attachment after clicking?";

/// Combines intent, matches and a tip into a `ComposedReply`.
pub struct ResponseComposer {
    min_confidence: f32,
    max_suggestions: usize,
}

impl ResponseComposer {
    /// Create a composer with the given confidence threshold and
    /// suggestion limit.
    pub fn new(min_confidence: f32, max_suggestions: usize) -> Self {
        Self {
            min_confidence,
            max_suggestions,
        }
    }

    /// Compose the reply for a request.
    ///
    /// The tip is drawn uniformly from the full tip set on every call,
    /// regardless of intent. Pass a seeded RNG to pin the draw in tests.
    pub fn compose<R: Rng>(
        &self,
        intent: Intent,
        matches: &[MatchResult],
        kb: &KnowledgeBase,
        rng: &mut R,
    ) -> ComposedReply {
        let tip = self.pick_tip(kb, rng);

        if intent == Intent::Greeting {
            return self.greeting_reply(tip);
        }

        let confident = matches
            .first()
            .is_some_and(|top| top.score >= self.min_confidence);

        if confident {
            // First match is the primary answer; the rest become
            // related-question suggestions.
            if let Some(entry) = kb.entry(matches[0].entry_idx) {
                let mut message = entry.answer.clone();
                if let Some(contact) = &entry.escalation_contact {
                    message.push_str(&format!(" For anything urgent, contact {}.", contact));
                }
                return ComposedReply {
                    intent,
                    message,
                    steps: entry.steps.clone(),
                    suggestions: self.suggestions(&matches[1..], kb),
                    tip,
                    follow_up: self.follow_up(intent),
                };
            }
        }

        if intent != Intent::Unknown {
            // Known topic but no confident match: generic per-intent
            // guidance, with the weak matches still offered as leads.
            return ComposedReply {
                intent,
                message: template_message(intent).to_string(),
                steps: generic_steps(intent),
                suggestions: self.suggestions(matches, kb),
                tip,
                follow_up: self.follow_up(intent),
            };
        }

        // Neither a confident match nor a known intent.
        ComposedReply {
            intent: Intent::Unknown,
            message: "I'm not sure I understood. I can help with phishing, passwords, MFA, \
                      VPN, updates, sensitive data and incident reporting. Could you rephrase, \
                      or escalate to the security team?"
                .to_string(),
            steps: vec![],
            suggestions: vec![],
            tip,
            follow_up: None,
        }
    }

    fn greeting_reply(&self, tip: String) -> ComposedReply {
        ComposedReply {
            intent: Intent::Greeting,
            message: "Hello! I'm CyberGuard, your security-awareness assistant. I can help \
                      with phishing, passwords, MFA, VPN, software updates, sensitive data \
                      and incident reporting. How can I help?"
                .to_string(),
            steps: vec![],
            suggestions: vec![
                Suggestion {
                    question: "How do I create a strong password?".to_string(),
                    score: 1.0,
                },
                Suggestion {
                    question: "How do I spot a suspicious email?".to_string(),
                    score: 1.0,
                },
                Suggestion {
                    question: "What is MFA?".to_string(),
                    score: 1.0,
                },
            ],
            tip,
            follow_up: None,
        }
    }

    fn suggestions(&self, matches: &[MatchResult], kb: &KnowledgeBase) -> Vec<Suggestion> {
        matches
            .iter()
            .filter_map(|m| {
                kb.entry(m.entry_idx).map(|entry| Suggestion {
                    question: entry.question.clone(),
                    score: m.score,
                })
            })
            .take(self.max_suggestions)
            .collect()
    }

    fn follow_up(&self, intent: Intent) -> Option<String> {
        if intent == Intent::PhishingIncident {
            Some(PHISHING_FOLLOW_UP.to_string())
        } else {
            None
        }
    }

    fn pick_tip<R: Rng>(&self, kb: &KnowledgeBase, rng: &mut R) -> String {
        let tips = kb.tips();
        if tips.is_empty() {
            return DEFAULT_TIP.to_string();
        }
        tips[rng.gen_range(0..tips.len())].clone()
    }
}

/// Generic template answer for a known intent without a confident match.
fn template_message(intent: Intent) -> &'static str {
    match intent {
        Intent::PhishingIncident => {
            "Understood. For a potential phishing attempt, let's stay methodical: do not \
             interact with the email and report it to the security team."
        }
        Intent::PasswordSecurity => {
            "Let's sort out your password question. Use the self-service reset first; if the \
             account stays locked, ask IT support for a secure reset."
        }
        Intent::Mfa => {
            "Multi-factor authentication adds a second proof of identity on top of your \
             password. Prefer an authenticator app over SMS codes."
        }
        Intent::Vpn => {
            "The VPN protects your traffic on untrusted networks. Install the client from \
             the IT portal and connect before accessing internal resources."
        }
        Intent::Updates => {
            "Updates close known vulnerabilities. Apply critical patches promptly and reboot \
             when the installer asks for it."
        }
        Intent::DataSensitivity => {
            "Sensitive data needs approved channels. Share files only through sanctioned \
             tools and limit access to people who genuinely need it."
        }
        Intent::IncidentReporting => {
            "If you suspect a security incident, report it right away. Collect what you saw \
             without altering anything and contact the security team."
        }
        Intent::Greeting | Intent::Unknown => "",
    }
}

/// Generic remediation steps for a known intent without a confident match.
fn generic_steps(intent: Intent) -> Vec<String> {
    let steps: &[&str] = match intent {
        Intent::PhishingIncident => &[
            "Do not click links or open attachments in the email.",
            "If you entered credentials, change them immediately and enable MFA.",
            "Capture the sender, subject and link, then report the email to the security team.",
        ],
        Intent::PasswordSecurity => &[
            "Use the password manager provided by the organization.",
            "Create passwords of at least 12 characters mixing cases, digits and symbols.",
            "Enable MFA on every critical account.",
            "Never reuse the same password.",
        ],
        Intent::Mfa => &[
            "Prefer authenticator apps over SMS codes.",
            "Store backup codes in a secure vault.",
            "Enable MFA on every account that supports it.",
        ],
        Intent::Vpn => &[
            "Download the VPN client from the organization's IT portal.",
            "Connect the VPN before accessing any internal resource.",
            "Always use the VPN on public or untrusted networks.",
            "Disconnect the VPN session after use.",
        ],
        Intent::Updates => &[
            "Apply critical patches within 48 hours.",
            "Install routine patches within two weeks.",
            "Reboot the device after a critical patch.",
            "Verify that the update applied successfully.",
        ],
        Intent::DataSensitivity => &[
            "Share sensitive files only through approved tools.",
            "Encrypt data in transit and at rest.",
            "Restrict access to people who are actually authorized.",
            "Apply the principle of least privilege.",
        ],
        Intent::IncidentReporting => &[
            "Collect evidence (logs, screenshots, emails) without altering it.",
            "Contact the security team immediately.",
            "Open a ticket in the incident tracking system if available.",
            "Notify your manager of the situation.",
        ],
        Intent::Greeting | Intent::Unknown => &[],
    };
    steps.iter().map(|s| s.to_string()).collect()
}
