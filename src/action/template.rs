#![forbid(unsafe_code)]

const PLACEHOLDER: &str = "{}";

/// Fills `{}` placeholders left to right. Placeholders without a matching
/// argument stay literal; surplus arguments are ignored.
#[must_use]
pub fn render(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    let mut args = args.iter();
    while let Some(pos) = rest.find(PLACEHOLDER) {
        let Some(arg) = args.next() else {
            break;
        };
        out.push_str(&rest[..pos]);
        out.push_str(arg);
        rest = &rest[pos + PLACEHOLDER.len()..];
    }
    out.push_str(rest);
    out
}
