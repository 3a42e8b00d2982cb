use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use gloo_net::http::Request;
use serde::Serialize;
use thiserror::Error;

use crate::config;
use crate::utils::analytics::{Demographics, Gender};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LeadField {
    Name,
    Email,
    Whatsapp,
    Company,
    Crm,
    LeadsPerMonth,
    Gender,
    Age,
}

impl LeadField {
    /// Field name used in focus events.
    pub fn key(&self) -> &'static str {
        match self {
            LeadField::Name => "name",
            LeadField::Email => "email",
            LeadField::Whatsapp => "whatsapp",
            LeadField::Company => "company",
            LeadField::Crm => "crm",
            LeadField::LeadsPerMonth => "leadsPerMonth",
            LeadField::Gender => "gender",
            LeadField::Age => "age",
        }
    }
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Crm {
    Hubspot,
    Pipedrive,
    Rdstation,
    Salesforce,
    Outro,
}

impl Crm {
    pub const ALL: [Crm; 5] = [Crm::Hubspot, Crm::Pipedrive, Crm::Rdstation, Crm::Salesforce, Crm::Outro];

    pub fn value(&self) -> &'static str {
        match self {
            Crm::Hubspot => "hubspot",
            Crm::Pipedrive => "pipedrive",
            Crm::Rdstation => "rdstation",
            Crm::Salesforce => "salesforce",
            Crm::Outro => "outro",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Crm::Hubspot => "HubSpot",
            Crm::Pipedrive => "Pipedrive",
            Crm::Rdstation => "RD Station",
            Crm::Salesforce => "Salesforce",
            Crm::Outro => "Outro",
        }
    }

    pub fn from_value(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.value() == value)
    }
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LeadsPerMonth {
    #[serde(rename = "0-50")]
    UpTo50,
    #[serde(rename = "51-150")]
    UpTo150,
    #[serde(rename = "151-300")]
    UpTo300,
    #[serde(rename = "300+")]
    Over300,
}

impl LeadsPerMonth {
    pub const ALL: [LeadsPerMonth; 4] = [
        LeadsPerMonth::UpTo50,
        LeadsPerMonth::UpTo150,
        LeadsPerMonth::UpTo300,
        LeadsPerMonth::Over300,
    ];

    pub fn value(&self) -> &'static str {
        match self {
            LeadsPerMonth::UpTo50 => "0-50",
            LeadsPerMonth::UpTo150 => "51-150",
            LeadsPerMonth::UpTo300 => "151-300",
            LeadsPerMonth::Over300 => "300+",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LeadsPerMonth::UpTo50 => "Até 50 leads",
            LeadsPerMonth::UpTo150 => "51 a 150 leads",
            LeadsPerMonth::UpTo300 => "151 a 300 leads",
            LeadsPerMonth::Over300 => "Mais de 300 leads",
        }
    }

    pub fn from_value(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.value() == value)
    }
}

/// Raw form input, exactly as typed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LeadForm {
    pub name: String,
    pub email: String,
    pub whatsapp: String,
    pub company: String,
    pub crm: String,
    pub leads_per_month: String,
    pub gender: String,
    pub age: String,
}

impl LeadForm {
    pub fn set(&mut self, field: LeadField, value: String) {
        match field {
            LeadField::Name => self.name = value,
            LeadField::Email => self.email = value,
            LeadField::Whatsapp => self.whatsapp = value,
            LeadField::Company => self.company = value,
            LeadField::Crm => self.crm = value,
            LeadField::LeadsPerMonth => self.leads_per_month = value,
            LeadField::Gender => self.gender = value,
            LeadField::Age => self.age = value,
        }
    }
}

/// A lead that passed validation.
#[derive(Clone, Debug, PartialEq)]
pub struct Lead {
    pub name: String,
    pub email: String,
    pub whatsapp: String,
    pub company: String,
    pub crm: Crm,
    pub leads_per_month: LeadsPerMonth,
    pub gender: Option<Gender>,
    pub age: Option<u32>,
}

impl Lead {
    pub fn demographics(&self) -> Demographics {
        Demographics {
            gender: self.gender,
            age: self.age,
        }
    }

    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }
}

pub type FieldErrors = BTreeMap<LeadField, &'static str>;

pub fn is_valid_email(email: &str) -> bool {
    if email.len() > 255 || email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((_, tld)) => tld.len() >= 2 && domain.split('.').all(|label| !label.is_empty()),
        None => false,
    }
}

pub fn whatsapp_digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

pub fn validate(form: &LeadForm) -> Result<Lead, FieldErrors> {
    let mut errors = FieldErrors::new();

    let name = form.name.trim();
    let name_len = name.chars().count();
    if name_len < 3 {
        errors.insert(LeadField::Name, "Nome deve ter pelo menos 3 caracteres");
    } else if name_len > 100 {
        errors.insert(LeadField::Name, "Nome deve ter no máximo 100 caracteres");
    }

    let email = form.email.trim();
    if !is_valid_email(email) {
        errors.insert(LeadField::Email, "Email inválido");
    }

    let whatsapp = whatsapp_digits(&form.whatsapp);
    if !(10..=13).contains(&whatsapp.len()) {
        errors.insert(LeadField::Whatsapp, "WhatsApp inválido (inclua o DDD)");
    }

    let company = form.company.trim();
    let company_len = company.chars().count();
    if company_len < 2 {
        errors.insert(LeadField::Company, "Nome da empresa deve ter pelo menos 2 caracteres");
    } else if company_len > 100 {
        errors.insert(LeadField::Company, "Nome da empresa deve ter no máximo 100 caracteres");
    }

    let crm = Crm::from_value(&form.crm);
    if crm.is_none() {
        errors.insert(LeadField::Crm, "Selecione o CRM que você utiliza");
    }

    let leads_per_month = LeadsPerMonth::from_value(&form.leads_per_month);
    if leads_per_month.is_none() {
        errors.insert(LeadField::LeadsPerMonth, "Selecione o volume de leads por mês");
    }

    let gender = if form.gender.is_empty() {
        None
    } else {
        let parsed = Gender::from_value(&form.gender);
        if parsed.is_none() {
            errors.insert(LeadField::Gender, "Selecione uma opção válida");
        }
        parsed
    };

    let age = match form.age.trim() {
        "" => None,
        raw => match raw.parse::<u32>() {
            Ok(age) if (18..=120).contains(&age) => Some(age),
            _ => {
                errors.insert(LeadField::Age, "Idade deve estar entre 18 e 120 anos");
                None
            }
        },
    };

    match (crm, leads_per_month) {
        (Some(crm), Some(leads_per_month)) if errors.is_empty() => Ok(Lead {
            name: name.to_string(),
            email: email.to_string(),
            whatsapp,
            company: company.to_string(),
            crm,
            leads_per_month,
            gender,
            age,
        }),
        _ => Err(errors),
    }
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    pub name: String,
    pub email: String,
    pub whatsapp: String,
    pub company: String,
    pub crm: Crm,
    pub leads_per_month: LeadsPerMonth,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    pub session_id: String,
    pub page_url: String,
    pub submitted_at: String,
}

impl WebhookPayload {
    pub fn new(lead: &Lead, session_id: String, page_url: String, now: DateTime<Utc>) -> Self {
        WebhookPayload {
            name: lead.name.clone(),
            email: lead.email.clone(),
            whatsapp: lead.whatsapp.clone(),
            company: lead.company.clone(),
            crm: lead.crm,
            leads_per_month: lead.leads_per_month,
            gender: lead.gender,
            age: lead.age,
            session_id,
            page_url,
            submitted_at: now.to_rfc3339(),
        }
    }
}

#[derive(Debug, Error)]
pub enum LeadError {
    #[error("webhook request failed: {0}")]
    Network(#[from] gloo_net::Error),
    #[error("webhook answered with status {0}")]
    Status(u16),
}

/// Posts the lead to the webhook. Only the status code is looked at.
pub async fn submit_lead(payload: &WebhookPayload) -> Result<(), LeadError> {
    let response = Request::post(config::get_webhook_url())
        .json(payload)?
        .send()
        .await?;
    if !response.ok() {
        return Err(LeadError::Status(response.status()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn filled() -> LeadForm {
        LeadForm {
            name: "  Maria Souza ".into(),
            email: "maria@empresa.com.br".into(),
            whatsapp: "(11) 98765-4321".into(),
            company: "Empresa X".into(),
            crm: "pipedrive".into(),
            leads_per_month: "51-150".into(),
            gender: String::new(),
            age: String::new(),
        }
    }

    #[test]
    fn complete_form_is_accepted() {
        let lead = validate(&filled()).unwrap();
        assert_eq!(lead.name, "Maria Souza");
        assert_eq!(lead.whatsapp, "11987654321");
        assert_eq!(lead.crm, Crm::Pipedrive);
        assert_eq!(lead.leads_per_month, LeadsPerMonth::UpTo150);
        assert_eq!(lead.gender, None);
        assert_eq!(lead.first_name(), "Maria");
    }

    #[test]
    fn empty_form_reports_every_required_field() {
        let errors = validate(&LeadForm::default()).unwrap_err();
        let fields: Vec<_> = errors.keys().copied().collect();
        assert_eq!(
            fields,
            vec![
                LeadField::Name,
                LeadField::Email,
                LeadField::Whatsapp,
                LeadField::Company,
                LeadField::Crm,
                LeadField::LeadsPerMonth
            ]
        );
    }

    #[test]
    fn length_limits() {
        let mut form = filled();
        form.name = "Al".into();
        form.company = "x".repeat(101);
        let errors = validate(&form).unwrap_err();
        assert!(errors.contains_key(&LeadField::Name));
        assert!(errors.contains_key(&LeadField::Company));

        form.name = "a".repeat(100);
        form.company = "AB".into();
        assert!(validate(&form).is_ok());
    }

    #[test]
    fn email_rules() {
        for ok in ["a@b.co", "nome.sobrenome+tag@dominio.com.br"] {
            assert!(is_valid_email(ok), "{}", ok);
        }
        for bad in ["", "semarroba.com", "@dominio.com", "a@b", "a@b.c", "a b@c.com", "a@@b.com", "a@b..com", "a@.b.com", "a@b.com."] {
            assert!(!is_valid_email(bad), "{}", bad);
        }
        let long = format!("{}@x.com", "a".repeat(250));
        assert!(!is_valid_email(&long));
    }

    #[test]
    fn whatsapp_digit_count() {
        let mut form = filled();
        form.whatsapp = "9876-5432".into();
        assert!(validate(&form).unwrap_err().contains_key(&LeadField::Whatsapp));
        form.whatsapp = "+55 (11) 98765-4321".into();
        assert_eq!(validate(&form).unwrap().whatsapp, "5511987654321");
    }

    #[test]
    fn optional_demographics() {
        let mut form = filled();
        form.gender = "prefer-not-say".into();
        form.age = "17".into();
        let errors = validate(&form).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains_key(&LeadField::Age));

        form.age = "42".into();
        let lead = validate(&form).unwrap();
        assert_eq!(lead.demographics().gender, Some(Gender::PreferNotSay));
        assert_eq!(lead.demographics().age, Some(42));

        form.age = "cento".into();
        assert!(validate(&form).is_err());
    }

    #[test]
    fn unknown_select_values_are_rejected() {
        let mut form = filled();
        form.crm = "zoho".into();
        form.leads_per_month = "1000".into();
        let errors = validate(&form).unwrap_err();
        assert!(errors.contains_key(&LeadField::Crm));
        assert!(errors.contains_key(&LeadField::LeadsPerMonth));
    }

    #[test]
    fn payload_layout() {
        let lead = validate(&filled()).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 11, 20, 12, 0, 0).unwrap();
        let payload = WebhookPayload::new(&lead, "s-1".into(), "https://site/".into(), now);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["leadsPerMonth"], "51-150");
        assert_eq!(json["crm"], "pipedrive");
        assert_eq!(json["sessionId"], "s-1");
        assert_eq!(json["submittedAt"], "2025-11-20T12:00:00+00:00");
        assert!(json.get("gender").is_none());
    }
}
