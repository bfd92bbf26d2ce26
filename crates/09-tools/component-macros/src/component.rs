//! 组件声明宏实现：`#[controller]` 与 `#[service]`

use crate::utils::{
    extract_generic_type, field_has_attribute, is_attribute, is_type_named, parse_optional_string,
    parse_required_string, registration_fn_ident,
};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse::Parse, parse::ParseStream, punctuated::Punctuated, Expr, Fields, ItemStruct, Lit,
    LitStr, Meta, Path, Result, Token,
};

/// 组件种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    Controller,
    Service,
}

/// 组件配置参数
#[derive(Debug, Clone, Default)]
pub struct ComponentArgs {
    /// 显式 Bean 名称（仅业务组件）
    pub name: Option<String>,
    /// 可失败的零参构造函数路径
    pub constructor: Option<Path>,
    /// 实现的接口
    pub implements: Vec<Path>,
}

impl Parse for ComponentArgs {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut args = ComponentArgs::default();

        if input.peek(LitStr) {
            let name: LitStr = input.parse()?;
            args.name = Some(name.value());
            if input.is_empty() {
                return Ok(args);
            }
            input.parse::<Token![,]>()?;
        }

        let parsed = Punctuated::<Meta, Token![,]>::parse_terminated(input)?;

        for meta in parsed {
            match meta {
                Meta::NameValue(nv) if nv.path.is_ident("name") => {
                    args.name = Some(string_value(&nv.value)?);
                }
                Meta::NameValue(nv) if nv.path.is_ident("constructor") => {
                    let path = string_value(&nv.value)?;
                    args.constructor = Some(syn::parse_str::<Path>(&path).map_err(|_| {
                        syn::Error::new_spanned(&nv.value, "constructor 必须是函数路径")
                    })?);
                }
                Meta::List(list) if list.path.is_ident("implements") => {
                    let traits =
                        list.parse_args_with(Punctuated::<Path, Token![,]>::parse_terminated)?;
                    args.implements.extend(traits);
                }
                other => {
                    return Err(syn::Error::new_spanned(
                        other,
                        "不支持的参数，可用参数: name, constructor, implements(...)",
                    ));
                }
            }
        }

        Ok(args)
    }
}

fn string_value(expr: &Expr) -> Result<String> {
    match expr {
        Expr::Lit(expr_lit) => match &expr_lit.lit {
            Lit::Str(lit_str) => Ok(lit_str.value()),
            _ => Err(syn::Error::new_spanned(expr, "期望字符串字面量")),
        },
        _ => Err(syn::Error::new_spanned(expr, "期望字符串字面量")),
    }
}

/// 实现 #[controller] 与 #[service] 宏
pub fn component_impl(kind: ComponentKind, args: TokenStream, input: TokenStream) -> TokenStream {
    let component_args = if args.is_empty() {
        ComponentArgs::default()
    } else {
        match syn::parse::<ComponentArgs>(args) {
            Ok(args) => args,
            Err(e) => return e.to_compile_error().into(),
        }
    };

    let input_struct = match syn::parse::<ItemStruct>(input) {
        Ok(item) => item,
        Err(e) => return e.to_compile_error().into(),
    };

    match expand(kind, component_args, input_struct) {
        Ok(expanded) => expanded.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn expand(kind: ComponentKind, args: ComponentArgs, mut input_struct: ItemStruct) -> Result<TokenStream2> {
    if !input_struct.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input_struct.generics,
            "组件类型不能带泛型参数",
        ));
    }
    if kind == ComponentKind::Controller && (args.name.is_some() || !args.implements.is_empty()) {
        return Err(syn::Error::new_spanned(
            &input_struct.ident,
            "controller 只支持 constructor 参数",
        ));
    }

    let request_mapping = take_request_mapping(&mut input_struct)?;
    if kind == ComponentKind::Service && request_mapping.is_some() {
        return Err(syn::Error::new_spanned(
            &input_struct.ident,
            "request_mapping 只能用于 controller",
        ));
    }

    let injections = take_injection_points(&mut input_struct)?;

    let struct_name = &input_struct.ident;
    let struct_name_string = struct_name.to_string();

    let kind_call = match (kind, &args.name) {
        (ComponentKind::Controller, _) => quote! { .controller() },
        (ComponentKind::Service, Some(name)) => quote! { .named_service(#name) },
        (ComponentKind::Service, None) => quote! { .service() },
    };

    let mapping_call = request_mapping.map(|path| quote! { .request_mapping(#path) });

    let constructor_call = match &args.constructor {
        Some(path) => quote! { .constructor(#path) },
        None => quote! { .default_constructor() },
    };

    let implements_calls = args.implements.iter().map(|trait_path| {
        quote! {
            .implements::<dyn #trait_path>(|instance| instance as ::std::sync::Arc<dyn #trait_path>)
        }
    });

    let handlers_call = (kind == ComponentKind::Controller).then(|| {
        quote! { .handlers(<#struct_name as ::mvc_common::RequestMappings>::handler_methods) }
    });

    let registration_fn_name = registration_fn_ident(struct_name);

    Ok(quote! {
        #input_struct

        impl ::mvc_common::QualifiedName for #struct_name {
            fn qualified_name() -> ::std::string::String {
                ::mvc_common::TypeName::qualify(::core::module_path!(), #struct_name_string)
            }
        }

        // 使用 ctor 在程序启动时自动注册组件定义
        #[::ctor::ctor]
        fn #registration_fn_name() {
            ::mvc_common::register_component_definition(
                ::mvc_common::ComponentDefinition::builder::<#struct_name>()
                    #kind_call
                    #mapping_call
                    #constructor_call
                    #(#implements_calls)*
                    #(#injections)*
                    #handlers_call
                    .build(),
            );
        }
    })
}

/// 取出结构体上的 `#[request_mapping("...")]`
fn take_request_mapping(input_struct: &mut ItemStruct) -> Result<Option<String>> {
    let mut mapping = None;
    let mut kept = Vec::with_capacity(input_struct.attrs.len());
    for attr in input_struct.attrs.drain(..) {
        if is_attribute(&attr, "request_mapping") {
            mapping = Some(parse_required_string(&attr, "path")?);
        } else {
            kept.push(attr);
        }
    }
    input_struct.attrs = kept;
    Ok(mapping)
}

/// 取出 `#[autowired]` 字段，生成对应的注入点声明
fn take_injection_points(input_struct: &mut ItemStruct) -> Result<Vec<TokenStream2>> {
    let struct_name = input_struct.ident.clone();
    let fields = match &mut input_struct.fields {
        Fields::Named(fields) => &mut fields.named,
        Fields::Unit => return Ok(Vec::new()),
        Fields::Unnamed(fields) => {
            if fields
                .unnamed
                .iter()
                .any(|field| field_has_attribute(field, "autowired"))
            {
                return Err(syn::Error::new_spanned(
                    fields,
                    "autowired 只能用于具名字段",
                ));
            }
            return Ok(Vec::new());
        }
    };

    let mut injections = Vec::new();
    for field in fields.iter_mut() {
        let Some(position) = field
            .attrs
            .iter()
            .position(|attr| is_attribute(attr, "autowired"))
        else {
            continue;
        };
        let attr = field.attrs.remove(position);
        let key = parse_optional_string(&attr, "name")?;

        if !is_type_named(&field.ty, "Autowired") {
            return Err(syn::Error::new_spanned(
                &field.ty,
                "autowired 字段的类型必须是 Autowired<T>",
            ));
        }
        let inner = extract_generic_type(&field.ty)
            .ok_or_else(|| syn::Error::new_spanned(&field.ty, "Autowired 缺少类型参数"))?;

        let field_ident = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(&*field, "autowired 只能用于具名字段"))?;
        let field_name = field_ident.to_string();
        let field_ty = &field.ty;
        let key_expr = match key {
            Some(key) => quote! { ::core::option::Option::Some(#key) },
            None => quote! { ::core::option::Option::None },
        };

        injections.push(quote! {
            .inject::<#inner>(#field_name, #key_expr, {
                fn accessor(owner: &#struct_name) -> &#field_ty {
                    &owner.#field_ident
                }
                accessor
            })
        });
    }
    Ok(injections)
}
