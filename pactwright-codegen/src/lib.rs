use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use quote::quote_spanned;

/// `#[pact_test("Consumer", "Provider", configure)]` turns a function into a test that runs
/// against the mock provider and writes the pact once the body has passed.
#[proc_macro_attribute]
pub fn pact_test(attrs: TokenStream, item: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(item as syn::ItemFn);
    let args = syn::parse_macro_input!(attrs as syn::AttributeArgs);

    let signature = &input.sig;
    let block = &input.block;

    if args.len() < 3 {
        return quote! {
            compile_error!("A consumer name, a provider name and a configuration function should be passed to the macro");
        }
        .into();
    }

    let consumer_name = match participant_name(&args[0], "consumer") {
        Ok(name) => name,
        Err(stream) => return stream.into(),
    };
    let provider_name = match participant_name(&args[1], "provider") {
        Ok(name) => name,
        Err(stream) => return stream.into(),
    };

    let configuration_function;
    if let syn::NestedMeta::Meta(syn::Meta::Path(function_path)) = &args[2] {
        configuration_function = function_path;
    } else {
        let error = quote! {
            compile_error!("The third argument should be a configuration function!");
        };

        return error.into();
    }

    let output = quote! {
        #[test]
        #signature {
            let mut __pact_configuration = pactwright::PactConfiguration::new(#consumer_name, #provider_name);
            #configuration_function(&mut __pact_configuration);
            if let Err(e) = pactwright::PactSession::before_test(__pact_configuration) {
                panic!("Pact Error: {}", e);
            }

            if let Err(e) = std::panic::catch_unwind(|| {
                #block
            }) {
                pactwright::PactSession::abort_test();
                std::panic::resume_unwind(e);
            }
            if let Err(e) = pactwright::PactSession::after_test() {
                panic!("Pact Error: {}", e);
            }
        }
    };

    TokenStream::from(output)
}

fn participant_name(
    argument: &syn::NestedMeta,
    role: &str,
) -> Result<String, proc_macro2::TokenStream> {
    match argument {
        syn::NestedMeta::Lit(syn::Lit::Str(name)) => {
            validate_participant_name(&name.value(), role, name.span())?;
            Ok(name.value())
        }
        _ => {
            let message = format!("The {} name should be a string literal!", role);
            Err(quote! {
                compile_error!(#message);
            })
        }
    }
}

fn validate_participant_name(
    name: &str,
    role: &str,
    span: Span,
) -> Result<(), proc_macro2::TokenStream> {
    if name.trim().is_empty() {
        let message = format!("The {} name can't be empty!", role);
        return Err(quote_spanned! {span=>
            compile_error!(#message);
        });
    }

    Ok(())
}
