//! Distinguished name flattening.

use x509_parser::x509::{AttributeTypeAndValue, X509Name};

use super::types::Name;

/// Flattens a distinguished name into the six well-known components.
///
/// Every value of a component is kept, joined with `,` in certificate order.
/// Values that are not representable as a string are skipped.
pub(crate) fn describe_name(name: &X509Name<'_>) -> Name {
    Name {
        country: join_values(name.iter_country()),
        state_province: join_values(name.iter_state_or_province()),
        locality: join_values(name.iter_locality()),
        organization: join_values(name.iter_organization()),
        organizational_unit: join_values(name.iter_organizational_unit()),
        common_name: join_values(name.iter_common_name()),
    }
}

fn join_values<'n, 'a: 'n, I>(values: I) -> String
where
    I: Iterator<Item = &'n AttributeTypeAndValue<'a>>,
{
    values
        .filter_map(|value| match value.as_str() {
            Ok(s) => Some(s.to_string()),
            Err(e) => {
                log::debug!("Skipping non-string name attribute {}: {e}", value.attr_type());
                None
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}
