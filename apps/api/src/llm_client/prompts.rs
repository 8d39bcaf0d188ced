// Shared prompt fragments and the template filler.
// Each feature that calls the model keeps its own prompts.rs alongside it.

/// Appended to every analysis prompt.
pub const JSON_ONLY_INSTRUCTION: &str = "Return ONLY valid JSON matching the structure above. \
    Do NOT include any text outside the JSON. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Fills `{name}` placeholders in a single left-to-right pass.
///
/// Values are inserted verbatim; a placeholder that appears inside an inserted
/// value is never expanded. Braces that do not name a known placeholder (JSON
/// examples in the template) are copied through unchanged.
pub fn fill_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(
        template.len() + vars.iter().map(|(_, v)| v.len()).sum::<usize>(),
    );
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let hit = vars.iter().find_map(|(name, value)| {
            after
                .strip_prefix(name)
                .and_then(|tail| tail.strip_prefix('}'))
                .map(|tail| (*value, tail))
        });

        match hit {
            Some((value, tail)) => {
                out.push_str(value);
                rest = tail;
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
