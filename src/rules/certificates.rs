//! TLS certificate rules.

use super::{Rule, RuleContext, Violation};
use crate::findings::Severity;
use crate::model::{Resource, ResourceKind};

pub(crate) static RULES: &[Rule] = &[
    Rule {
        id: "certificate-expiring",
        severity: Severity::Warning,
        kinds: &[ResourceKind::CertificateSummary],
        check: certificate_expiring,
    },
    Rule {
        id: "certificate-unused",
        severity: Severity::Low,
        kinds: &[ResourceKind::CertificateSummary],
        check: certificate_unused,
    },
    Rule {
        id: "certificate-expiry-unknown",
        severity: Severity::Low,
        kinds: &[ResourceKind::CertificateSummary],
        check: certificate_expiry_unknown,
    },
];

fn certificate_expiring(resource: &Resource, ctx: &RuleContext) -> Vec<Violation> {
    let Resource::CertificateSummary(cert) = resource else {
        return Vec::new();
    };
    let Some(expires_at) = cert.expires_at else {
        return Vec::new();
    };
    let days_left = (expires_at - ctx.now).num_days();
    if days_left >= ctx.certificate_expiry_days {
        return Vec::new();
    }
    let message = if days_left < 0 {
        format!("Certificate expired {} days ago.", -days_left)
    } else {
        format!("Certificate expires in {days_left} days.")
    };
    vec![Violation::new(&cert.id, message)
        .with_evidence("domain", &cert.domain)
        .with_evidence("expires_at", expires_at.to_rfc3339())]
}

fn certificate_unused(resource: &Resource, _ctx: &RuleContext) -> Vec<Violation> {
    let Resource::CertificateSummary(cert) = resource else {
        return Vec::new();
    };
    if cert.in_use {
        return Vec::new();
    }
    vec![
        Violation::new(&cert.id, "Certificate is not in use by any resource.")
            .with_evidence("domain", &cert.domain),
    ]
}

fn certificate_expiry_unknown(resource: &Resource, _ctx: &RuleContext) -> Vec<Violation> {
    let Resource::CertificateSummary(cert) = resource else {
        return Vec::new();
    };
    if cert.expires_at.is_some() {
        return Vec::new();
    }
    vec![
        Violation::new(&cert.id, "Certificate expiry date could not be determined.")
            .with_evidence("domain", &cert.domain),
    ]
}
