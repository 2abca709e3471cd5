//! CSV export of the two output tables, with optional CRM header naming.
//!
//! The CRM convention names every column `Object::Field`. Renaming is
//! a pure header rewrite: cell values are identical in both formats.

use crate::{
    campaign::TransactionRecord,
    error::GenResult,
    profile::ContactRecord,
};
use serde::Serialize;
use std::io::Write;

/// (internal name, CRM name), in record field order.
pub type FieldMapping = &'static [(&'static str, &'static str)];

/// Mirrors the field order of [`TransactionRecord`]; rows are serialized
/// positionally under this header.
pub const TRANSACTION_FIELDS: FieldMapping = &[
    ("date", "Gift_Transaction__c::Transaction_Date__c"),
    ("campaign_start", "Campaign::StartDate"),
    ("campaign_end", "Campaign::EndDate"),
    ("channel", "Gift_Transaction__c::Channel__c"),
    ("campaign_name", "Campaign::Name"),
    ("campaign_type", "Campaign::Type"),
    ("donation_amount", "Gift_Transaction__c::Amount__c"),
    ("payment_method", "Gift_Transaction__c::Payment_Method__c"),
    ("cost", "Campaign::Cost_Per_Contact__c"),
    ("reactivity", "Campaign::Response_Rate__c"),
    ("contact_id", "Contact::Id"),
    ("amount_decile", "Gift_Transaction__c::Amount_Decile__c"),
];

/// Mirrors the field order (and serde names) of [`ContactRecord`].
pub const CONTACT_FIELDS: FieldMapping = &[
    ("contact_id", "Contact::Id"),
    ("salutation", "Contact::Salutation"),
    ("gender", "Contact::Gender__c"),
    ("first_name", "Contact::FirstName"),
    ("last_name", "Contact::LastName"),
    ("phone", "Contact::Phone"),
    ("address_1", "Contact::MailingStreet"),
    ("address_2", "Contact::MailingStreet2__c"),
    ("zip_code", "Contact::MailingPostalCode"),
    ("city", "Contact::MailingCity"),
    ("country", "Contact::MailingCountry"),
    ("job", "Contact::Title"),
    ("origin_decile", "Contact::Wealth_Decile__c"),
    ("Creation_date", "Contact::CreatedDate"),
    ("Creation_year", "Contact::Created_Year__c"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Field names as emitted by the generator.
    Internal,
    /// `Object::Field` names of the external CRM.
    Crm,
}

impl ExportFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "internal" => Some(Self::Internal),
            "crm" => Some(Self::Crm),
            _ => None,
        }
    }
}

/// CRM name of an internal column; unknown columns pass through.
pub fn crm_name<'a>(mapping: FieldMapping, internal: &'a str) -> &'a str {
    mapping
        .iter()
        .find(|(from, _)| *from == internal)
        .map_or(internal, |(_, to)| *to)
}

pub fn header(mapping: FieldMapping, format: ExportFormat) -> Vec<&'static str> {
    mapping
        .iter()
        .map(|(internal, crm)| match format {
            ExportFormat::Internal => *internal,
            ExportFormat::Crm => *crm,
        })
        .collect()
}

pub fn write_transactions_csv<W: Write>(
    out: W,
    transactions: &[TransactionRecord],
    format: ExportFormat,
) -> GenResult<()> {
    write_table(out, &header(TRANSACTION_FIELDS, format), transactions)
}

pub fn write_contacts_csv<W: Write>(
    out: W,
    contacts: &[ContactRecord],
    format: ExportFormat,
) -> GenResult<()> {
    write_table(out, &header(CONTACT_FIELDS, format), contacts)
}

fn write_table<W: Write, R: Serialize>(out: W, header: &[&str], rows: &[R]) -> GenResult<()> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(out);
    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
