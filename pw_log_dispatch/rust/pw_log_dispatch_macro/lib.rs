// Copyright 2025 The Pigweed Authors
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License. You may obtain a copy of
// the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied. See the
// License for the specific language governing permissions and limitations under
// the License.

//! Compile time translation of `printf` style format strings for the
//! `pw_log_dispatch` macros.  Not intended to be used directly.

use proc_macro::TokenStream;
use proc_macro2::{Ident, Span};
use quote::quote;
use syn::{
    Expr, LitStr, Token,
    parse::{Parse, ParseStream},
    parse_macro_input,
};

mod printf;

use printf::Cast;

type TokenStream2 = proc_macro2::TokenStream;

// A printf format string literal followed by its arguments.
struct PrintfArgs {
    format_string: LitStr,
    args: Vec<Expr>,
}

impl Parse for PrintfArgs {
    fn parse(input: ParseStream) -> syn::parse::Result<Self> {
        let format_string: LitStr = input.parse()?;
        let mut args = Vec::new();
        while !input.is_empty() {
            input.parse::<Token![,]>()?;
            if input.is_empty() {
                break;
            }
            args.push(input.parse()?);
        }

        Ok(PrintfArgs {
            format_string,
            args,
        })
    }
}

fn cast_argument(cast: Cast, expression: &Expr) -> TokenStream2 {
    match cast {
        Cast::Signed(ty) | Cast::Unsigned(ty) => {
            let ty = Ident::new(ty, Span::call_site());
            quote! {((#expression) as #ty)}
        }
        Cast::Float => quote! {((#expression) as f64)},
        Cast::Char => quote! {((#expression) as char)},
        Cast::Str => quote! {::core::convert::AsRef::<str>::as_ref(&(#expression))},
        Cast::None => quote! {(#expression)},
    }
}

fn expand(input: PrintfArgs) -> syn::Result<TokenStream2> {
    let core_fmt = printf::parse(&input.format_string.value())
        .and_then(|fragments| printf::to_core_fmt(&fragments))
        .map_err(|e| syn::Error::new(input.format_string.span(), e))?;

    if core_fmt.casts.len() != input.args.len() {
        return Err(syn::Error::new(
            input.format_string.span(),
            format!(
                "Format string has {} conversions but {} arguments were given",
                core_fmt.casts.len(),
                input.args.len()
            ),
        ));
    }

    let format_string = core_fmt.format_string;
    let args = core_fmt
        .casts
        .iter()
        .zip(&input.args)
        .map(|(cast, expression)| cast_argument(*cast, expression));

    Ok(quote! {
        ::core::format_args!(#format_string #(, #args)*)
    })
}

/// Expands `_printf_format_args!("format", args...)` to a
/// `core::format_args!` call.  Integer arguments are cast to the width
/// their length modifier names, so `%hhu` prints `300` as `44`.
#[proc_macro]
pub fn _printf_format_args(tokens: TokenStream) -> TokenStream {
    let input = parse_macro_input!(tokens as PrintfArgs);

    match expand(input) {
        Ok(token_stream) => token_stream.into(),
        Err(e) => e.to_compile_error().into(),
    }
}
