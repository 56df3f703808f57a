//! Conversion prompt construction.

use crate::language::Language;

/// Build the message sent to the agent for one source file.
pub fn build_prompt(source: &Language, target: &Language, file_label: &str, code: &str) -> String {
    let from = &source.display_name;
    let to = &target.display_name;

    let mut prompt = String::with_capacity(code.len() + 1024);
    prompt.push_str(&format!("Please convert the following {from} code to {to}.\n\n"));
    prompt.push_str(&format!("{from} file: {file_label}\n\n"));
    prompt.push_str(&format!(
        "You are an expert software engineer specializing in converting {from} code to {to}.\n\n"
    ));
    prompt.push_str("Requirements:\n");
    prompt.push_str("1. Maintain the same functionality and logic\n");
    prompt.push_str(&format!("2. Use appropriate {to} design patterns and conventions\n"));
    prompt.push_str(&format!("3. Handle {from}-specific features appropriately:\n"));
    for hint in idiom_hints(source, target) {
        prompt.push_str("   - ");
        prompt.push_str(&hint);
        prompt.push('\n');
    }
    prompt.push_str("4. Add appropriate imports\n");
    prompt.push_str(&format!(
        "5. Use modern {} features when beneficial\n",
        modern_baseline(target)
    ));
    prompt.push_str("6. Maintain code structure and comments\n\n");
    prompt.push_str(&format!("{from} Code:\n```{}\n", source.fence));
    prompt.push_str(code);
    if !code.ends_with('\n') {
        prompt.push('\n');
    }
    prompt.push_str("```\n\n");
    prompt.push_str(&format!(
        "Please provide only the converted {to} code without explanations."
    ));
    prompt
}

/// How source idioms should map onto the target language.
fn idiom_hints(source: &Language, target: &Language) -> Vec<String> {
    match (source.name.as_str(), target.name.as_str()) {
        ("scala", "java") => [
            "Case classes -> Java records or POJOs with builder pattern",
            "Pattern matching -> switch expressions or if-else chains",
            "Option types -> Optional<T>",
            "Collections -> Java Collections API",
            "Higher-order functions -> Java 8+ functional interfaces",
        ]
        .into_iter()
        .map(str::to_string)
        .collect(),
        ("scala", "kotlin") => [
            "Case classes -> data classes",
            "Sealed traits -> sealed interfaces or classes",
            "Pattern matching -> when expressions",
            "Option types -> nullable types",
            "Collections -> Kotlin standard collections",
        ]
        .into_iter()
        .map(str::to_string)
        .collect(),
        _ => {
            let to = &target.display_name;
            vec![
                format!("Sum types and case classes -> the closest {to} data types"),
                format!("Optional values -> the idiomatic {to} optional representation"),
                format!("Pattern matching and dispatch -> {to} branching constructs"),
                format!("Higher-order functions -> {to} functions, closures or interfaces"),
                format!("Collection literals -> the {to} standard collections"),
            ]
        }
    }
}

fn modern_baseline(target: &Language) -> String {
    match target.name.as_str() {
        "java" => "Java (Java 17+)".to_string(),
        "csharp" => "C# (C# 12+)".to_string(),
        "python" => "Python (3.11+)".to_string(),
        "cpp" => "C++ (C++20)".to_string(),
        _ => target.display_name.clone(),
    }
}
