//! SOAP envelope for the MP0810 `AddInterfaceTransactions` call.

use std::fmt;
use std::io;

use quick_xml::events::{BytesDecl, BytesText, Event};
use quick_xml::Writer;
use tracksync_domain::constants::{
    EAM_PROMPT_SOURCE, EAM_SESSION_ID, EAM_SOURCE_CODE, EAM_SOURCE_SYSTEM, EAM_TRANS_CODE,
};
use tracksync_domain::{EamConfig, Transaction};

const NS_SOAP: &str = "http://schemas.xmlsoap.org/soap/envelope/";
const NS_XSD: &str = "http://www.w3.org/2001/XMLSchema";
const NS_XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";
const NS_SECEXT: &str = "http://schemas.xmlsoap.org/ws/2002/04/secext";
const NS_HEADERS: &str = "http://schemas.datastream.net/headers";
const NS_FUNCTION: &str = "http://schemas.datastream.net/MP_functions/MP0810_001";
const NS_TRANSACTIONS: &str =
    "http://schemas.datastream.net/MP_entities/InterfaceTransactions_001";
const NS_TRACKING: &str = "http://schemas.datastream.net/MP_entities/TrackingData_001";
const NS_FIELDS: &str = "http://schemas.datastream.net/MP_fields";

/// Renders transactions into the fixed-schema envelope.
///
/// The security context is captured once at construction. Text content goes
/// through [`BytesText::new`], so every value is escaped by the writer.
#[derive(Clone)]
pub struct EnvelopeBuilder {
    username: String,
    password: String,
    organization: String,
    origin_marker: String,
}

impl EnvelopeBuilder {
    pub fn new(config: &EamConfig) -> Self {
        Self {
            username: config.qualified_user(),
            password: config.password.clone(),
            organization: config.organization.clone(),
            origin_marker: config.origin_marker.clone(),
        }
    }

    /// Serialize `transaction` into a complete SOAP document.
    ///
    /// # Errors
    /// Only if the in-memory writer fails, which a `Vec` sink never does in
    /// practice.
    pub fn build(&self, transaction: &Transaction) -> io::Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

        writer
            .create_element("Envelope")
            .with_attribute(("xmlns", NS_SOAP))
            .with_attribute(("xmlns:xsd", NS_XSD))
            .with_attribute(("xmlns:xsi", NS_XSI))
            .write_inner_content(|w| {
                self.write_header(w)?;
                w.create_element("Body")
                    .write_inner_content(|w| self.write_call(w, transaction))?;
                Ok(())
            })?;

        String::from_utf8(writer.into_inner())
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
    }

    fn write_header(&self, w: &mut Writer<Vec<u8>>) -> io::Result<()> {
        w.create_element("Header").write_inner_content(|w| {
            w.create_element("Security").with_attribute(("xmlns", NS_SECEXT)).write_inner_content(
                |w| {
                    w.create_element("UsernameToken").write_inner_content(|w| {
                        text_element(w, "Username", None, &self.username)?;
                        text_element(w, "Password", None, &self.password)
                    })?;
                    Ok(())
                },
            )?;
            text_element(w, "SessionScenario", Some(NS_HEADERS), "terminate")?;
            text_element(w, "Organization", Some(NS_HEADERS), &self.organization)
        })?;
        Ok(())
    }

    fn write_call(&self, w: &mut Writer<Vec<u8>>, transaction: &Transaction) -> io::Result<()> {
        w.create_element("MP0810_AddInterfaceTransactions_001")
            .with_attribute(("xmlns:xsi", NS_XSI))
            .with_attribute(("xmlns", NS_FUNCTION))
            .with_attribute(("verb", "Add"))
            .with_attribute(("noun", "InterfaceTransactions"))
            .with_attribute(("version", "001"))
            .with_attribute(("callname", "AddInterfaceTransactions"))
            .write_inner_content(|w| {
                w.create_element("InterfaceTransactions")
                    .with_attribute(("xmlns", NS_TRANSACTIONS))
                    .write_inner_content(|w| {
                        w.create_element("TrackingData")
                            .with_attribute(("xmlns", NS_TRACKING))
                            .write_inner_content(|w| self.write_tracking_fields(w, transaction))?;
                        Ok(())
                    })?;
                Ok(())
            })?;
        Ok(())
    }

    fn write_tracking_fields(
        &self,
        w: &mut Writer<Vec<u8>>,
        transaction: &Transaction,
    ) -> io::Result<()> {
        let request_number = transaction.request_number.to_string();
        let item_quantity = transaction.item_quantity.to_string();
        let fields: [(&str, &str); 11] = [
            ("SOURCESYSTEM", EAM_SOURCE_SYSTEM),
            ("SOURCECODE", EAM_SOURCE_CODE),
            ("TRANSCODE", EAM_TRANS_CODE),
            ("SESSIONID", EAM_SESSION_ID),
            ("CHANGED", &self.origin_marker),
            ("PROMPTDATA1", EAM_PROMPT_SOURCE),
            ("PROMPTDATA2", &request_number),
            ("PROMPTDATA3", &transaction.item_code),
            ("PROMPTDATA4", &item_quantity),
            ("PROMPTDATA5", &transaction.completion_date),
            ("PROMPTDATA6", &transaction.delivery_unit_name),
        ];
        for (name, value) in fields {
            text_element(w, name, Some(NS_FIELDS), value)?;
        }
        Ok(())
    }
}

/// `<name xmlns="ns">value</name>`, with `value` escaped.
fn text_element(
    w: &mut Writer<Vec<u8>>,
    name: &str,
    namespace: Option<&str>,
    value: &str,
) -> io::Result<()> {
    let element = w.create_element(name);
    let element = match namespace {
        Some(ns) => element.with_attribute(("xmlns", ns)),
        None => element,
    };
    element.write_text_content(BytesText::new(value))?;
    Ok(())
}

impl fmt::Debug for EnvelopeBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvelopeBuilder")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("organization", &self.organization)
            .field("origin_marker", &self.origin_marker)
            .finish()
    }
}
