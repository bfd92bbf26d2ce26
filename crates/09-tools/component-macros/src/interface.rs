//! 接口声明宏实现：`#[interface]`

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_quote, ItemTrait, Result, TypeParamBound};

/// 实现 #[interface] 宏
pub fn interface_impl(args: TokenStream, input: TokenStream) -> TokenStream {
    if !args.is_empty() {
        return syn::Error::new(proc_macro2::Span::call_site(), "interface 不接受参数")
            .to_compile_error()
            .into();
    }

    let item_trait = match syn::parse::<ItemTrait>(input) {
        Ok(item) => item,
        Err(e) => return e.to_compile_error().into(),
    };

    match expand(item_trait) {
        Ok(expanded) => expanded.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn expand(mut item_trait: ItemTrait) -> Result<TokenStream2> {
    if !item_trait.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &item_trait.generics,
            "接口不能带泛型参数",
        ));
    }

    // 容器跨线程共享实例，接口对象必须是 Send + Sync
    for required in ["Send", "Sync"] {
        if !has_supertrait(&item_trait, required) {
            let ident = syn::Ident::new(required, proc_macro2::Span::call_site());
            item_trait
                .supertraits
                .push(parse_quote!(::core::marker::#ident));
        }
    }

    let trait_name = &item_trait.ident;
    let trait_name_string = trait_name.to_string();

    Ok(quote! {
        #item_trait

        impl ::mvc_common::QualifiedName for dyn #trait_name {
            fn qualified_name() -> ::std::string::String {
                ::mvc_common::TypeName::qualify(::core::module_path!(), #trait_name_string)
            }
        }
    })
}

fn has_supertrait(item_trait: &ItemTrait, name: &str) -> bool {
    item_trait.supertraits.iter().any(|bound| match bound {
        TypeParamBound::Trait(trait_bound) => trait_bound
            .path
            .segments
            .last()
            .map_or(false, |segment| segment.ident == name),
        _ => false,
    })
}
