//! 宏工具函数

use proc_macro2::Span;
use syn::{Attribute, Field, Ident, LitStr, Meta, Result, Type};

/// 从类型中提取第一个泛型参数，例如 `Autowired<dyn Foo>` 得到 `dyn Foo`
pub fn extract_generic_type(ty: &Type) -> Option<&Type> {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
                if let Some(syn::GenericArgument::Type(inner_type)) = args.args.first() {
                    return Some(inner_type);
                }
            }
        }
    }
    None
}

/// 检查类型路径的最后一段是否为指定名称
pub fn is_type_named(ty: &Type, name: &str) -> bool {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map_or(false, |segment| segment.ident == name),
        _ => false,
    }
}

/// 检查类型是否为 Result<T, E>
pub fn is_result_type(ty: &Type) -> bool {
    is_type_named(ty, "Result")
}

/// 检查属性是否为指定名称
pub fn is_attribute(attr: &Attribute, attr_name: &str) -> bool {
    attr.path()
        .get_ident()
        .map(|ident| ident == attr_name)
        .unwrap_or(false)
}

/// 检查字段是否有特定属性
pub fn field_has_attribute(field: &Field, attr_name: &str) -> bool {
    field.attrs.iter().any(|attr| is_attribute(attr, attr_name))
}

/// 解析可选的字符串参数
///
/// 支持 `#[attr]`、`#[attr("value")]` 和 `#[attr(name = "value")]` 三种写法
pub fn parse_optional_string(attr: &Attribute, key: &str) -> Result<Option<String>> {
    match &attr.meta {
        Meta::Path(_) => Ok(None),
        Meta::List(list) => {
            if let Ok(lit) = list.parse_args::<LitStr>() {
                return Ok(Some(lit.value()));
            }
            let mut result = None;
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident(key) {
                    let lit: LitStr = meta.value()?.parse()?;
                    result = Some(lit.value());
                    Ok(())
                } else {
                    Err(meta.error(format!("不支持的参数，期望 `{}`", key)))
                }
            })?;
            Ok(result)
        }
        Meta::NameValue(nv) => Err(syn::Error::new_spanned(
            nv,
            format!("请使用 #[{}(\"...\")] 形式", key),
        )),
    }
}

/// 解析必填的字符串参数，例如 `#[request_mapping("/user")]`
pub fn parse_required_string(attr: &Attribute, key: &str) -> Result<String> {
    parse_optional_string(attr, key)?
        .ok_or_else(|| syn::Error::new_spanned(attr, "缺少路径参数"))
}

/// 将驼峰命名转换为蛇形命名
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    let chars: Vec<char> = s.chars().collect();

    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() && i > 0 {
            // 检查前一个字符是否为小写，或者下一个字符是否为小写
            let prev_is_lower = chars.get(i - 1).map_or(false, |c| c.is_lowercase());
            let next_is_lower = chars.get(i + 1).map_or(false, |c| c.is_lowercase());

            if prev_is_lower || next_is_lower {
                result.push('_');
            }
        }
        result.extend(ch.to_lowercase());
    }

    result
}

/// 生成组件注册函数名
pub fn registration_fn_ident(struct_name: &Ident) -> Ident {
    Ident::new(
        &format!(
            "__register_component_{}",
            to_snake_case(&struct_name.to_string())
        ),
        Span::call_site(),
    )
}
