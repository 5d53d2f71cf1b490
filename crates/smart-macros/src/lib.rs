use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{parse_macro_input, Data, DeriveInput, Fields, Lit, Meta};

/// Derive macro that generates a companion `*Timeseries` struct for collecting
/// per-timestep flux values. All fields in the source struct must be `f64`.
///
/// The generated timeseries struct has the same fields as `Vec<f64>`, with
/// `with_capacity`, `push`, `len`, `is_empty`, `column` and `columns`
/// methods. The source struct gains `FIELD_COUNT`, `field_names()` and
/// `values()`.
///
/// Options, given as `#[fluxes(key = "value", ...)]`:
/// - `timeseries_name`: override the default `{StructName}Timeseries` name.
/// - `ops_trait`: path of a `FluxesTimeseriesOps`-shaped trait to implement
///   on the timeseries struct by forwarding to the inherent methods.
#[proc_macro_derive(Fluxes, attributes(fluxes))]
pub fn derive_fluxes(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let name = &input.ident;

    let options = match FluxesOptions::parse(&input) {
        Ok(o) => o,
        Err(e) => return e.to_compile_error().into(),
    };
    let ts_name = options
        .timeseries_name
        .unwrap_or_else(|| format_ident!("{}Timeseries", name));

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return syn::Error::new_spanned(
                    name,
                    "Fluxes can only be derived for structs with named fields",
                )
                .to_compile_error()
                .into();
            }
        },
        _ => {
            return syn::Error::new_spanned(name, "Fluxes can only be derived for structs")
                .to_compile_error()
                .into();
        }
    };

    if fields.is_empty() {
        return syn::Error::new_spanned(name, "Fluxes struct must have at least one field")
            .to_compile_error()
            .into();
    }

    let mut field_names = Vec::new();
    let mut field_idents = Vec::new();
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        if !is_f64_type(&field.ty) {
            return syn::Error::new_spanned(&field.ty, "Fluxes derive: all fields must be f64")
                .to_compile_error()
                .into();
        }
        field_names.push(ident.to_string());
        field_idents.push(ident);
    }

    let first_field = &field_idents[0];
    let n_fields = field_idents.len();
    let field_name_strs: Vec<&str> = field_names.iter().map(|s| s.as_str()).collect();

    let ts_fields = field_idents.iter().map(|f| quote! { pub #f: Vec<f64> });
    let with_cap_fields = field_idents.iter().map(|f| quote! { #f: Vec::with_capacity(n) });
    let push_fields = field_idents.iter().map(|f| quote! { self.#f.push(f.#f); });
    let column_arms = field_idents
        .iter()
        .zip(&field_name_strs)
        .map(|(f, s)| quote! { #s => Some(self.#f.as_slice()) });
    let column_pairs = field_idents
        .iter()
        .zip(&field_name_strs)
        .map(|(f, s)| quote! { (#s, self.#f.as_slice()) });

    let ops_impl = options.ops_trait.map(|path| {
        quote! {
            impl #path<#name> for #ts_name {
                fn with_capacity(n: usize) -> Self {
                    #ts_name::with_capacity(n)
                }
                fn push(&mut self, f: &#name) {
                    #ts_name::push(self, f)
                }
                fn len(&self) -> usize {
                    #ts_name::len(self)
                }
                fn is_empty(&self) -> bool {
                    #ts_name::is_empty(self)
                }
            }
        }
    });

    let expanded = quote! {
        /// Auto-generated timeseries struct for collecting per-timestep fluxes.
        #[derive(Debug, Clone, Default)]
        pub struct #ts_name {
            #(#ts_fields,)*
        }

        impl #ts_name {
            /// Pre-allocate all vectors for `n` timesteps.
            pub fn with_capacity(n: usize) -> Self {
                Self {
                    #(#with_cap_fields,)*
                }
            }

            /// Push a single timestep's fluxes.
            pub fn push(&mut self, f: &#name) {
                #(#push_fields)*
            }

            /// Number of timesteps stored.
            pub fn len(&self) -> usize {
                self.#first_field.len()
            }

            /// Returns `true` if no timesteps have been stored.
            pub fn is_empty(&self) -> bool {
                self.#first_field.is_empty()
            }

            /// Look up one column by field name.
            pub fn column(&self, name: &str) -> Option<&[f64]> {
                match name {
                    #(#column_arms,)*
                    _ => None,
                }
            }

            /// All columns as (name, values) pairs, in declaration order.
            pub fn columns(&self) -> [(&'static str, &[f64]); #n_fields] {
                [#(#column_pairs),*]
            }
        }

        #ops_impl

        impl #name {
            /// Number of flux fields.
            pub const FIELD_COUNT: usize = #n_fields;

            /// Returns the field names of this flux struct.
            pub fn field_names() -> &'static [&'static str] {
                &[#(#field_name_strs),*]
            }

            /// Field values in declaration order.
            pub fn values(&self) -> [f64; #n_fields] {
                [#(self.#field_idents),*]
            }
        }
    };

    expanded.into()
}

#[derive(Default)]
struct FluxesOptions {
    timeseries_name: Option<proc_macro2::Ident>,
    ops_trait: Option<syn::Path>,
}

impl FluxesOptions {
    fn parse(input: &DeriveInput) -> syn::Result<Self> {
        let mut options = Self::default();
        for attr in &input.attrs {
            if !attr.path().is_ident("fluxes") {
                continue;
            }
            let nested = attr.parse_args_with(
                syn::punctuated::Punctuated::<Meta, syn::Token![,]>::parse_terminated,
            )?;
            for meta in nested {
                let Meta::NameValue(nv) = meta else {
                    return Err(syn::Error::new_spanned(meta, "expected `key = \"value\"`"));
                };
                let value = string_value(&nv.value)?;
                if nv.path.is_ident("timeseries_name") {
                    options.timeseries_name = Some(format_ident!("{}", value.value()));
                } else if nv.path.is_ident("ops_trait") {
                    options.ops_trait = Some(value.parse()?);
                } else {
                    return Err(syn::Error::new_spanned(nv.path, "unknown fluxes option"));
                }
            }
        }
        Ok(options)
    }
}

fn string_value(expr: &syn::Expr) -> syn::Result<syn::LitStr> {
    if let syn::Expr::Lit(expr_lit) = expr {
        if let Lit::Str(lit_str) = &expr_lit.lit {
            return Ok(lit_str.clone());
        }
    }
    Err(syn::Error::new_spanned(expr, "expected a string literal"))
}

fn is_f64_type(ty: &syn::Type) -> bool {
    if let syn::Type::Path(type_path) = ty {
        type_path.path.is_ident("f64")
    } else {
        false
    }
}
