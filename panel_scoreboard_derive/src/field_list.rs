use crate::helper;
use proc_macro2::TokenStream;
use syn::DeriveInput;

pub fn impl_field_list(input: TokenStream) -> TokenStream {
    let ast: DeriveInput = match syn::parse2(input) {
        Ok(ast) => ast,
        Err(e) => return e.to_compile_error(),
    };

    match expand(&ast) {
        Ok(tokens) => tokens,
        Err(e) => e.to_compile_error(),
    }
}

fn expand(ast: &DeriveInput) -> syn::Result<TokenStream> {
    let struct_name = &ast.ident;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    let mut columns: Vec<String> = Vec::new();
    for field in helper::extract_fields(&ast.data)?.named.iter() {
        let column = match helper::extract_rename(&field.attrs)? {
            Some(rename) => rename,
            None => match &field.ident {
                Some(ident) => ident.to_string(),
                None => continue,
            },
        };
        columns.push(column);
    }
    let field_list = columns.join(",");

    Ok(quote::quote! {
        impl #impl_generics FieldList for #struct_name #ty_generics #where_clause {
            fn field_list() -> &'static str {
                #field_list
            }
        }
    })
}
