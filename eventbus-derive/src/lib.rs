extern crate proc_macro;

use proc_macro::{TokenStream, TokenTree};

fn get_type_name(input: TokenStream) -> String {
    let mut iter = input.into_iter();
    loop {
        match iter.next() {
            Some(TokenTree::Ident(ident)) => {
                let name = ident.to_string();
                if name == "struct" || name == "enum" || name == "union" {
                    match iter.next() {
                        Some(TokenTree::Ident(type_name)) => return type_name.to_string(),
                        _ => break,
                    }
                }
            },
            None => break,
            _ => (),
        }
    }
    panic!("no type name found");
}

/// Marks a type as an event channel. Each channel gets its own dispatch table.
#[proc_macro_derive(Channel)]
pub fn derive_channel(input: TokenStream) -> TokenStream {
    let type_name = get_type_name(input);

    format!("
#[allow(non_snake_case)]
mod {0}_Channel_impls {{
    use ::eventbus::event::Channel;
    impl Channel for super::{0} {{ }}
}}", type_name).parse().unwrap()
}

/// Marks a type as a payload accepted by scoped (UI) subscriptions.
#[proc_macro_derive(UiPayload)]
pub fn derive_ui_payload(input: TokenStream) -> TokenStream {
    let type_name = get_type_name(input);

    format!("
#[allow(non_snake_case)]
mod {0}_UiPayload_impls {{
    use ::eventbus::event::UiPayload;
    impl UiPayload for super::{0} {{ }}
}}", type_name).parse().unwrap()
}
