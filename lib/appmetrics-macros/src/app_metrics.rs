/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{
    Data, DeriveInput, Field, Fields, GenericArgument, Ident, LitStr, PathArguments, Type,
};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Kind {
    Counter,
    Gauge,
    GaugeFloat64,
    FunctionalGauge,
    FunctionalGaugeFloat64,
    Histogram,
    Meter,
    Timer,
}

impl Kind {
    fn from_ident(ident: &Ident) -> Option<Self> {
        let kind = match ident.to_string().as_str() {
            "Counter" => Kind::Counter,
            "Gauge" => Kind::Gauge,
            "GaugeFloat64" => Kind::GaugeFloat64,
            "FunctionalGauge" => Kind::FunctionalGauge,
            "FunctionalGaugeFloat64" => Kind::FunctionalGaugeFloat64,
            "Histogram" => Kind::Histogram,
            "Meter" => Kind::Meter,
            "Timer" => Kind::Timer,
            _ => return None,
        };
        Some(kind)
    }

    fn as_str(&self) -> &'static str {
        match self {
            Kind::Counter => "Counter",
            Kind::Gauge => "Gauge",
            Kind::GaugeFloat64 => "GaugeFloat64",
            Kind::FunctionalGauge => "FunctionalGauge",
            Kind::FunctionalGaugeFloat64 => "FunctionalGaugeFloat64",
            Kind::Histogram => "Histogram",
            Kind::Meter => "Meter",
            Kind::Timer => "Timer",
        }
    }

    fn compute_type(&self) -> Option<TokenStream> {
        match self {
            Kind::FunctionalGauge => Some(quote! { i64 }),
            Kind::FunctionalGaugeFloat64 => Some(quote! { f64 }),
            _ => None,
        }
    }

    fn is_sampled(&self) -> bool {
        matches!(self, Kind::Histogram | Kind::Timer)
    }
}

struct MetricField<'a> {
    ident: &'a Ident,
    ty: &'a Type,
    name: LitStr,
    sample: Option<LitStr>,
    kind: Kind,
    tagged: bool,
}

impl MetricField<'_> {
    fn type_name(&self) -> String {
        if self.tagged {
            format!("Tagged<{}>", self.kind.as_str())
        } else {
            self.kind.as_str().to_string()
        }
    }
}

fn last_segment_kind(ty: &Type) -> Option<(&Ident, &PathArguments)> {
    let Type::Path(p) = ty else {
        return None;
    };
    if p.qself.is_some() {
        return None;
    }
    let seg = p.path.segments.last()?;
    Some((&seg.ident, &seg.arguments))
}

/// Returns the metric kind and whether the type is `Tagged<_>`.
fn classify(field: &Field, ident: &Ident) -> syn::Result<(Kind, bool)> {
    let invalid = || {
        syn::Error::new_spanned(
            &field.ty,
            format!("field {ident}: metric attribute appears on non-metric type"),
        )
    };

    let (seg_ident, args) = last_segment_kind(&field.ty).ok_or_else(invalid)?;
    if seg_ident == "Tagged" {
        let PathArguments::AngleBracketed(args) = args else {
            return Err(invalid());
        };
        let Some(GenericArgument::Type(inner)) = args.args.first() else {
            return Err(invalid());
        };
        let (inner_ident, inner_args) = last_segment_kind(inner).ok_or_else(invalid)?;
        if !inner_args.is_empty() {
            return Err(invalid());
        }
        let kind = Kind::from_ident(inner_ident).ok_or_else(invalid)?;
        if kind.compute_type().is_some() {
            return Err(syn::Error::new_spanned(
                &field.ty,
                format!("field {ident}: tagged {} is not supported", kind.as_str()),
            ));
        }
        Ok((kind, true))
    } else {
        if !args.is_empty() {
            return Err(invalid());
        }
        let kind = Kind::from_ident(seg_ident).ok_or_else(invalid)?;
        Ok((kind, false))
    }
}

fn parse_metric_field<'a>(field: &'a Field) -> syn::Result<Option<MetricField<'a>>> {
    let Some(attr) = field.attrs.iter().find(|a| a.path().is_ident("metric")) else {
        return Ok(None);
    };
    let Some(ident) = &field.ident else {
        return Err(syn::Error::new_spanned(field, "unnamed field"));
    };

    let mut name: Option<LitStr> = None;
    let mut sample: Option<LitStr> = None;
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("name") {
            name = Some(meta.value()?.parse()?);
            Ok(())
        } else if meta.path.is_ident("sample") {
            sample = Some(meta.value()?.parse()?);
            Ok(())
        } else {
            Err(meta.error("unsupported metric attribute, expected `name` or `sample`"))
        }
    })?;

    let Some(name) = name else {
        return Err(syn::Error::new_spanned(
            attr,
            format!("field {ident}: missing metric name"),
        ));
    };
    if name.value().is_empty() {
        return Err(syn::Error::new_spanned(
            &name,
            format!("field {ident}: empty metric name"),
        ));
    }

    let (kind, tagged) = classify(field, ident)?;
    Ok(Some(MetricField {
        ident,
        ty: &field.ty,
        name,
        sample,
        kind,
        tagged,
    }))
}

fn sample_var(ident: &Ident) -> Ident {
    format_ident!("__sample_{}", ident)
}

fn expand_init(m: &MetricField<'_>, has_field: &dyn Fn(&Ident) -> bool) -> TokenStream {
    let ident = m.ident;
    let ty = m.ty;
    let name = &m.name;
    let sample = sample_var(ident);

    if m.tagged {
        return quote! {
            #ident: <#ty>::with_sample(#name, #sample)
        };
    }

    if let Some(ret) = m.kind.compute_type() {
        let accessor = format_ident!("compute_{}", ident);
        return if has_field(&accessor) {
            quote! {
                #ident: {
                    let __weak = __weak.clone();
                    <#ty>::new(move || {
                        __weak
                            .upgrade()
                            .map(|__m| {
                                let __f: &::appmetrics::ComputeFn<#ret> = &__m.#accessor;
                                __f.call()
                            })
                            .unwrap_or_default()
                    })
                }
            }
        } else {
            quote! {
                #ident: {
                    let __weak = __weak.clone();
                    let __f: fn(&Self) -> #ret = Self::#accessor;
                    <#ty>::new(move || __weak.upgrade().map(|__m| __f(&__m)).unwrap_or_default())
                }
            }
        };
    }

    if m.kind.is_sampled() {
        quote! {
            #ident: <#ty>::new(#sample.build())
        }
    } else {
        quote! {
            #ident: <#ty as ::core::default::Default>::default()
        }
    }
}

pub(super) fn derive(input: DeriveInput) -> TokenStream {
    let Data::Struct(data) = &input.data else {
        return quote! {
            compile_error!("derive(AppMetrics) can only be used on struct types");
        };
    };
    let Fields::Named(fields) = &data.fields else {
        return quote! {
            compile_error!("derive(AppMetrics) can only be used on structs with named fields");
        };
    };

    let mut metrics = Vec::new();
    let mut errors: Option<syn::Error> = None;
    for field in &fields.named {
        match parse_metric_field(field) {
            Ok(Some(m)) => metrics.push(m),
            Ok(None) => {}
            Err(e) => match &mut errors {
                Some(errors) => errors.combine(e),
                None => errors = Some(e),
            },
        }
    }
    if let Some(e) = errors {
        return e.to_compile_error();
    }

    let has_field = |accessor: &Ident| {
        fields
            .named
            .iter()
            .any(|f| f.ident.as_ref() == Some(accessor))
    };

    let decls = metrics.iter().map(|m| {
        let field = m.ident.to_string();
        let name = &m.name;
        let type_name = m.type_name();
        match &m.sample {
            Some(sample) => quote! {
                ::appmetrics::MetricDecl::new(#field, #name, #type_name).with_sample(#sample)
            },
            None => quote! {
                ::appmetrics::MetricDecl::new(#field, #name, #type_name)
            },
        }
    });

    let samples = metrics.iter().enumerate().map(|(i, m)| {
        let var = sample_var(m.ident);
        quote! {
            let #var = __decls[#i].sample_spec()?;
        }
    });

    let inits = fields.named.iter().map(|f| {
        let ident = &f.ident;
        match metrics.iter().find(|m| f.ident.as_ref() == Some(m.ident)) {
            Some(m) => expand_init(m, &has_field),
            None => quote! {
                #ident: ::core::default::Default::default()
            },
        }
    });

    let visits = metrics.iter().map(|m| {
        let ident = m.ident;
        let name = &m.name;
        quote! {
            f(#name, &self.#ident);
        }
    });

    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    quote! {
        impl #impl_generics ::appmetrics::PopulateMetrics for #struct_name #ty_generics #where_clause {
            fn declarations() -> ::std::vec::Vec<::appmetrics::MetricDecl> {
                ::std::vec![ #( #decls ),* ]
            }

            #[allow(clippy::redundant_closure)]
            fn populate() -> ::core::result::Result<::std::sync::Arc<Self>, ::appmetrics::DefinitionError> {
                let __decls = <Self as ::appmetrics::PopulateMetrics>::declarations();
                #( #samples )*
                ::core::result::Result::Ok(::std::sync::Arc::new_cyclic(
                    |__weak: &::std::sync::Weak<Self>| Self {
                        #( #inits ),*
                    },
                ))
            }
        }

        impl #impl_generics ::appmetrics::MetricsHolder for #struct_name #ty_generics #where_clause {
            fn visit_metrics(
                &self,
                f: &mut dyn FnMut(&str, &dyn ::appmetrics::BindMetric),
            ) {
                #( #visits )*
            }
        }
    }
}
