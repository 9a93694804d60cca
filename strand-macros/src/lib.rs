//! Procedural macros for the strand runtime.
//!
//! Only the test harness attribute lives here: it turns an `async fn`
//! into a regular `#[test]` that drives its body on a fresh runtime.

use proc_macro::{Delimiter, Group, TokenStream, TokenTree};

/// Reads `worker_threads = N` out of the attribute arguments.
///
/// Unknown keys are ignored so the attribute stays forward compatible.
fn parse_worker_threads(attr: &TokenStream) -> Option<usize> {
    let attr_str = attr.to_string();

    attr_str.split(',').find_map(|part| {
        part.trim()
            .strip_prefix("worker_threads")
            .map(|v| v.trim_start_matches([' ', '=']).trim())
            .and_then(|v| v.parse::<usize>().ok())
    })
}

/// Runs an `async fn` test on a dedicated runtime.
///
/// ```rust,ignore
/// #[strand::test]
/// async fn sleeps() {
///     strand::time::sleep(Duration::from_millis(10)).await;
/// }
///
/// #[strand::test(worker_threads = 2)]
/// async fn on_two_workers() {}
/// ```
///
/// The runtime is dropped at the end of the test, which joins every
/// worker thread and stops the timer driver.
#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut tokens = item.into_iter().collect::<Vec<_>>();

    if let Some(pos) = tokens
        .iter()
        .position(|t| matches!(t, TokenTree::Ident(id) if id.to_string() == "async"))
    {
        tokens.remove(pos);
    }

    let Some(pos) = tokens
        .iter()
        .rposition(|t| matches!(t, TokenTree::Group(g) if g.delimiter() == Delimiter::Brace))
    else {
        return "compile_error!(\"#[strand::test] expects a function body\");"
            .parse()
            .unwrap_or_default();
    };

    let block = match &tokens[pos] {
        TokenTree::Group(g) => g.stream().to_string(),
        _ => unreachable!(),
    };

    let mut builder = String::from("::strand::RuntimeBuilder::new()");
    if let Some(n) = parse_worker_threads(&attr) {
        builder.push_str(&format!(".worker_threads({n})"));
    }
    builder.push_str(".build()");

    let new_block = format!(
        "{{
        let runtime = {builder};
        runtime
            .block_on(async move {{ {block} }});
    }}"
    );

    let body = match new_block.parse() {
        Ok(body) => body,
        Err(err) => {
            let msg = format!("strand::test macro error: {err}");
            return format!("compile_error!({msg:?});")
                .parse()
                .unwrap_or_default();
        }
    };

    tokens[pos] = TokenTree::Group(Group::new(Delimiter::Brace, body));

    let test_attr: TokenStream = "#[test]".parse().unwrap_or_default();
    let mut result: Vec<TokenTree> = test_attr.into_iter().collect();
    result.extend(tokens);

    result.into_iter().collect()
}
