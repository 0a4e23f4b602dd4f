//! # Shaya Derive Macros
//!
//! This crate provides derive macros for the shaya console, specifically for
//! name-indexed access to the fields of entity records.
//!
//! ## Record Derive Macro
//!
//! The `Record` derive macro implements the `shaya::Record` trait for structs
//! with named fields. Every field becomes an accessor named after the field,
//! readable through `Record::get` and writable through `Record::set`. Field
//! types must implement `shaya::ToFieldValue` and `shaya::FromFieldValue`.
//!
//! ### Examples
//!
//! ```rust,ignore
//! use shaya::{FieldValue, Record};
//!
//! #[derive(Clone, Debug, Default, PartialEq, shaya_derive::Record)]
//! struct Farm {
//!     id: Option<i64>,
//!     farm_name: String,
//! }
//!
//! let mut farm = Farm::default();
//! farm.set("farm_name", FieldValue::from("La Esperanza")).unwrap();
//! assert_eq!(farm.get("farm_name"), Some(FieldValue::from("La Esperanza")));
//! assert_eq!(Farm::field_names(), &["id", "farm_name"]);
//! ```

#![recursion_limit = "128"]

extern crate proc_macro;
#[macro_use]
extern crate quote;
extern crate syn;

use proc_macro2::TokenStream;
use syn::{DeriveInput, parse_macro_input};

use derive_util::StructVisitor;

/// Derive the Record trait for structs with named fields.
#[proc_macro_derive(Record, attributes())]
pub fn derive_record(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let ty_name = input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let body = match input.data {
        syn::Data::Struct(ref ds) => {
            let mut rsv = RecordStructVisitor;
            rsv.visit_struct(&ty_name, ds)
        }
        syn::Data::Enum(_) => {
            panic!("enums are not supported; records are structs with named fields");
        }
        syn::Data::Union(_) => {
            panic!("unions are not supported");
        }
    };

    let generated = quote! {
        impl #impl_generics shaya::Record for #ty_name #ty_generics #where_clause {
            #body
        }
    };
    generated.into()
}

///////////////////////////////////////// RecordStructVisitor ////////////////////////////////////////

struct RecordStructVisitor;

impl StructVisitor for RecordStructVisitor {
    type Output = TokenStream;

    fn visit_struct_named_fields(
        &mut self,
        _ty_name: &syn::Ident,
        _ds: &syn::DataStruct,
        fields: &syn::FieldsNamed,
    ) -> Self::Output {
        let mut names = Vec::new();
        let mut get_arms = quote! {};
        let mut set_arms = quote! {};
        for field in fields.named.iter() {
            if let Some(field_ident) = &field.ident {
                let field_type = &field.ty;
                let field_name = field_ident.to_string();
                let field_name = if let Some(stripped) = field_name.strip_prefix("r#") {
                    stripped.to_string()
                } else {
                    field_name
                };
                get_arms = quote! {
                    #get_arms
                    #field_name => Some(<#field_type as shaya::ToFieldValue>::to_field_value(&self.#field_ident)),
                };
                set_arms = quote! {
                    #set_arms
                    #field_name => {
                        self.#field_ident = <#field_type as shaya::FromFieldValue>::from_field_value(value)
                            .map_err(|reason| shaya::RecordError::InvalidValue {
                                field: #field_name.to_string(),
                                reason,
                            })?;
                        Ok(())
                    }
                };
                names.push(field_name);
            }
        }
        quote! {
            fn field_names() -> &'static [&'static str] {
                &[#(#names),*]
            }

            fn get(&self, accessor: &str) -> Option<shaya::FieldValue> {
                match accessor {
                    #get_arms
                    _ => None,
                }
            }

            fn set(
                &mut self,
                accessor: &str,
                value: shaya::FieldValue,
            ) -> Result<(), shaya::RecordError> {
                match accessor {
                    #set_arms
                    _ => Err(shaya::RecordError::UnknownField(accessor.to_string())),
                }
            }
        }
    }
}
