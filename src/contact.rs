//! Contact form: client-side validation and a simulated submission.

use std::cell::RefCell;
use std::rc::Rc;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::config::SiteConfig;
use crate::page::{Page, Scheduler};

static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("required field is empty")]
    Empty,
    #[error("not an email address")]
    MalformedEmail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
}

#[derive(Debug, Clone)]
pub struct Field<E> {
    pub element: E,
    pub required: bool,
    pub kind: FieldKind,
}

pub fn is_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

/// Validates a single raw value. Emails are only checked once non-empty.
pub fn check(value: &str, required: bool, kind: FieldKind) -> Result<(), FieldError> {
    if required && value.trim().is_empty() {
        return Err(FieldError::Empty);
    }
    if kind == FieldKind::Email && !value.is_empty() && !is_email(value) {
        return Err(FieldError::MalformedEmail);
    }
    Ok(())
}

/// Fields to validate: every `[required]` field, plus every email-typed
/// field that isn't required, checked only once filled in.
pub fn collect_fields<E: PartialEq>(required: Vec<(E, FieldKind)>, emails: Vec<E>) -> Vec<Field<E>> {
    let mut fields: Vec<Field<E>> = required
        .into_iter()
        .map(|(element, kind)| Field { element, required: true, kind })
        .collect();
    for email in emails {
        if !fields.iter().any(|f| f.element == email) {
            fields.push(Field { element: email, required: false, kind: FieldKind::Email });
        }
    }
    fields
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Pending,
    Sent,
}

#[derive(Debug, PartialEq)]
pub enum SubmitOutcome {
    /// Index into the form's fields of every failing field.
    Rejected(Vec<(usize, FieldError)>),
    Pending,
    /// A submission is already in flight or done.
    Ignored,
}

pub struct ContactForm<P: Page> {
    form: P::Element,
    success: P::Element,
    submit: Option<P::Element>,
    fields: Vec<Field<P::Element>>,
    phase: Phase,
    invalid_border: String,
    pending_label: String,
}

impl<P: Page> ContactForm<P> {
    pub fn new(
        form: P::Element,
        success: P::Element,
        submit: Option<P::Element>,
        fields: Vec<Field<P::Element>>,
        config: &SiteConfig,
    ) -> Self {
        Self {
            form,
            success,
            submit,
            fields,
            phase: Phase::Idle,
            invalid_border: config.invalid_border.clone(),
            pending_label: config.pending_label.clone(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Every field's marker is recomputed from scratch on each attempt.
    pub fn validate(&self, page: &P) -> Vec<(usize, FieldError)> {
        let mut failures = Vec::new();
        for (i, field) in self.fields.iter().enumerate() {
            page.set_style(&field.element, "border-color", None);
            if let Err(err) = check(&page.value(&field.element), field.required, field.kind) {
                page.set_style(&field.element, "border-color", Some(&self.invalid_border));
                failures.push((i, err));
            }
        }
        failures
    }

    pub fn submit(&mut self, page: &P) -> SubmitOutcome {
        if self.phase != Phase::Idle {
            return SubmitOutcome::Ignored;
        }
        let failures = self.validate(page);
        if !failures.is_empty() {
            for (i, err) in &failures {
                log::debug!("Contact field {} rejected: {}", i, err);
            }
            return SubmitOutcome::Rejected(failures);
        }
        if let Some(button) = &self.submit {
            page.set_flag(button, "disabled", true);
            page.set_text(button, &self.pending_label);
        }
        self.phase = Phase::Pending;
        SubmitOutcome::Pending
    }

    /// Ends the simulated request: the form gives way to the success note.
    pub fn complete(&mut self, page: &P) {
        if self.phase != Phase::Pending {
            return;
        }
        page.set_hidden(&self.form, true);
        page.set_hidden(&self.success, false);
        self.phase = Phase::Sent;
        log::info!("Contact form sent");
    }

    pub fn clear_error(&self, page: &P, el: &P::Element) {
        page.set_style(el, "border-color", None);
    }
}

/// Validates and, on success, schedules completion after `delay_ms`.
pub fn handle_submit<P: Page, S: Scheduler>(
    form: &Rc<RefCell<ContactForm<P>>>,
    page: &P,
    scheduler: &S,
    delay_ms: u32,
) -> SubmitOutcome {
    let outcome = form.borrow_mut().submit(page);
    if outcome == SubmitOutcome::Pending {
        let form = Rc::clone(form);
        let page = page.clone();
        scheduler.schedule(
            delay_ms,
            Box::new(move || form.borrow_mut().complete(&page)),
        );
    }
    outcome
}
