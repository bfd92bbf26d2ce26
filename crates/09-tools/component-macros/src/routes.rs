//! 处理器方法声明宏实现：`#[routes]`

use crate::utils::{is_attribute, is_result_type, parse_required_string};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{FnArg, ImplItem, ImplItemFn, ItemImpl, Result, ReturnType};

/// 实现 #[routes] 宏
pub fn routes_impl(args: TokenStream, input: TokenStream) -> TokenStream {
    if !args.is_empty() {
        return syn::Error::new(proc_macro2::Span::call_site(), "routes 不接受参数")
            .to_compile_error()
            .into();
    }

    let item_impl = match syn::parse::<ItemImpl>(input) {
        Ok(item) => item,
        Err(e) => return e.to_compile_error().into(),
    };

    match expand(item_impl) {
        Ok(expanded) => expanded.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn expand(mut item_impl: ItemImpl) -> Result<TokenStream2> {
    if let Some((_, path, _)) = &item_impl.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "routes 只能用于固有 impl 块",
        ));
    }
    if !item_impl.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &item_impl.generics,
            "routes 不支持泛型 impl",
        ));
    }

    let self_ty = item_impl.self_ty.clone();
    let mut handlers = Vec::new();

    for item in item_impl.items.iter_mut() {
        let ImplItem::Fn(method) = item else {
            continue;
        };
        let Some(position) = method
            .attrs
            .iter()
            .position(|attr| is_attribute(attr, "request_mapping"))
        else {
            continue;
        };
        let attr = method.attrs.remove(position);
        let path = parse_required_string(&attr, "path")?;
        handlers.push(handler_method(&self_ty, method, &path)?);
    }

    Ok(quote! {
        #item_impl

        impl ::mvc_common::RequestMappings for #self_ty {
            fn handler_methods() -> ::std::vec::Vec<::mvc_common::HandlerMethod> {
                ::std::vec![#(#handlers),*]
            }
        }
    })
}

/// 为单个方法生成 `HandlerMethod` 构造表达式
fn handler_method(self_ty: &syn::Type, method: &ImplItemFn, path: &str) -> Result<TokenStream2> {
    let sig = &method.sig;
    if sig.asyncness.is_some() || !sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            sig,
            "处理器方法不能是 async 或泛型方法",
        ));
    }

    let mut inputs = sig.inputs.iter();
    match inputs.next() {
        Some(FnArg::Receiver(receiver)) if receiver.reference.is_some() && receiver.mutability.is_none() => {}
        _ => {
            return Err(syn::Error::new_spanned(
                sig,
                "处理器方法的第一个参数必须是 &self",
            ))
        }
    }
    let takes_request = match inputs.len() {
        0 => false,
        1 => true,
        _ => {
            return Err(syn::Error::new_spanned(
                &sig.inputs,
                "处理器方法最多接受一个 &Request 参数",
            ))
        }
    };

    let method_ident = &sig.ident;
    let method_name = method_ident.to_string();
    let (request_ident, call) = if takes_request {
        (quote! { request }, quote! { controller.#method_ident(request) })
    } else {
        (quote! { _request }, quote! { controller.#method_ident() })
    };
    let body = match &sig.output {
        ReturnType::Type(_, ty) if is_result_type(ty) => {
            quote! { #call.map_err(::std::convert::Into::into) }
        }
        _ => quote! { ::std::result::Result::Ok(#call) },
    };

    Ok(quote! {
        ::mvc_common::HandlerMethod::new(
            #method_name,
            #path,
            |controller: &#self_ty, #request_ident: &::mvc_common::Request| -> ::mvc_common::anyhow::Result<_> {
                #body
            },
        )
    })
}
