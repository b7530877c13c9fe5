use syn::{Attribute, Data, Fields, FieldsNamed, LitStr};

pub fn extract_fields(data: &Data) -> syn::Result<&FieldsNamed> {
    match *data {
        Data::Struct(ref data) => match data.fields {
            Fields::Named(ref fields) => Ok(fields),
            ref other => Err(syn::Error::new_spanned(other, "all fields must be named.")),
        },
        Data::Enum(ref data) => Err(syn::Error::new_spanned(
            data.enum_token,
            "struct expected, but got enum.",
        )),
        Data::Union(ref data) => Err(syn::Error::new_spanned(
            data.union_token,
            "struct expected, but got union.",
        )),
    }
}

/// Reads `#[column(rename = "...")]` from the field attributes.
pub fn extract_rename(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut rename = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("column")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                rename = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported column attribute"))
            }
        })?;
    }

    Ok(rename)
}
