// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Server-rendered HTML pages.

use crate::models::{FeedbackResponse, FeedbackSummaryDto};
use tera::{Context, Tera};

mod embedded {
    pub const BASE_HTML: &str = include_str!("../templates/base.html");
    pub const DASHBOARD_HTML: &str = include_str!("../templates/dashboard.html");
    pub const SUBMIT_HTML: &str = include_str!("../templates/submit.html");
    pub const SUCCESS_HTML: &str = include_str!("../templates/success.html");
    pub const ERROR_HTML: &str = include_str!("../templates/error.html");
}

/// Error banner selected by `/submit?error=...`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitError {
    Invalid,
    Server,
}

impl SubmitError {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "invalid" => Some(Self::Invalid),
            "server" => Some(Self::Server),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Invalid => "invalid",
            Self::Server => "server",
        }
    }
}

/// Renders the embedded page templates.
pub struct Views {
    tera: Tera,
}

impl Views {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_template("base.html", embedded::BASE_HTML)?;
        tera.add_raw_template("dashboard.html", embedded::DASHBOARD_HTML)?;
        tera.add_raw_template("submit.html", embedded::SUBMIT_HTML)?;
        tera.add_raw_template("success.html", embedded::SUCCESS_HTML)?;
        tera.add_raw_template("error.html", embedded::ERROR_HTML)?;
        Ok(Self { tera })
    }

    pub fn dashboard(
        &self,
        summary: &FeedbackSummaryDto,
        enhanced_feedback: &[FeedbackResponse],
    ) -> Result<String, tera::Error> {
        let mut context = Context::new();
        context.insert("summary", summary);
        context.insert("enhanced_feedback", enhanced_feedback);
        self.tera.render("dashboard.html", &context)
    }

    pub fn submit(&self, error: Option<SubmitError>) -> Result<String, tera::Error> {
        let mut context = Context::new();
        context.insert("error", &error.map(SubmitError::as_str).unwrap_or(""));
        self.tera.render("submit.html", &context)
    }

    pub fn success(&self) -> Result<String, tera::Error> {
        self.tera.render("success.html", &Context::new())
    }

    pub fn error(&self, message: &str) -> Result<String, tera::Error> {
        let mut context = Context::new();
        context.insert("error", message);
        self.tera.render("error.html", &context)
    }
}
