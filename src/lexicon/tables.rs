//! Seed word lists. Financial and role-action entries are stored unstemmed; the
//! [`Lexicon`](super::Lexicon) stems them once at construction.

pub const URGENT_WORDS: &[&str] = &[
    "urgent",
    "asap",
    "critical",
    "important",
    "overdue",
    "escalation",
    "priority",
    "now",
    "fast",
    "today",
    "quick",
    "quickly",
    "immediately",
    // two words: only ever compared against single tokens
    "right away",
];

pub const URGENT_PHRASES: &[&str] = &[
    "immediate action required",
    "time sensitive",
    "requires immediate attention",
    "do not delay",
    "respond immediately",
    "urgent request",
    "urgent matter",
    "action needed",
    "attention required",
];

pub const FINANCIAL_WORDS: &[&str] = &[
    "bank",
    "account",
    "transfer",
    "invoice",
    "transactions",
    "payment",
];

/// Role allowed to use financial vocabulary without raising a mismatch.
pub const FINANCE_ROLE: &str = "Finance";

pub const ROLE_ACTIONS: &[(&str, &[&str])] = &[
    (FINANCE_ROLE, &["payment", "invoice", "transfer", "account", "bank"]),
    ("HR", &["onboarding", "policy", "leave", "training"]),
    ("Engineer", &["code", "deploy", "bug", "build"]),
    ("Manager", &["approval", "review", "budget", "meeting"]),
];
