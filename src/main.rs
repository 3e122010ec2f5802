//! # formgrid CLI
//!
//! Usage:
//!   formgrid input.json -o normalized.json
//!   echo '[ ... ]' | formgrid -o normalized.json
//!   formgrid --example > contact-form.json

use std::env;
use std::fs;
use std::io::{self, Read};

use formgrid::GridConfig;

fn main() {
    let args: Vec<String> = env::args().collect();

    // Handle --example flag
    if args.iter().any(|a| a == "--example") {
        print!("{}", example_form_json());
        return;
    }

    // Read input
    let input = if args.len() > 1 && !args[1].starts_with('-') {
        fs::read_to_string(&args[1]).expect("Failed to read input file")
    } else {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).expect("Failed to read stdin");
        buf
    };

    // Parse output path
    let output_path = args
        .windows(2)
        .find(|w| w[0] == "-o")
        .map(|w| w[1].clone())
        .unwrap_or_else(|| "normalized.json".to_string());

    // Re-layout and normalize
    match formgrid::normalize_json(&input, GridConfig::default()) {
        Ok((json, issues)) => {
            for issue in &issues {
                eprintln!("  skipped {}: {}", issue.path, issue.reason);
            }
            fs::write(&output_path, &json).expect("Failed to write document");
            eprintln!(
                "✓ Written {} sections to {} ({} entries skipped)",
                json.matches("\"sectionId\"").count(),
                output_path,
                issues.len()
            );
        }
        Err(e) => {
            eprintln!("✗ Failed to load document: {}", e);
            std::process::exit(1);
        }
    }
}

fn example_form_json() -> &'static str {
    r##"[
  {
    "sectionId": "section-contact",
    "fields": [
      {
        "fieldId": "field-full-name",
        "fieldSettings": {
          "fieldId": "field-full-name",
          "fieldType": "shortText",
          "fieldLabel": "Full name",
          "fieldName": "full_name",
          "fieldSize": "medium",
          "placeholderText": "Jane Doe",
          "defaultValue": "",
          "minRange": 2,
          "maxRange": 80,
          "isRequired": true
        }
      },
      {
        "fieldId": "field-email",
        "fieldSettings": {
          "fieldId": "field-email",
          "fieldType": "shortText",
          "fieldLabel": "Email",
          "fieldName": "email",
          "fieldSize": "medium",
          "placeholderText": "jane@example.com",
          "isRequired": true
        }
      },
      {
        "fieldId": "field-topic",
        "fieldSettings": {
          "fieldId": "field-topic",
          "fieldType": "dropDownList",
          "fieldLabel": "Topic",
          "fieldName": "topic",
          "fieldSize": "large",
          "isRequired": false,
          "direction": "vertical",
          "options": [
            { "label": "Support", "value": "support" },
            { "label": "Sales", "value": "sales" },
            { "label": "Other", "value": "other" }
          ]
        }
      }
    ]
  },
  {
    "sectionId": "section-details",
    "fields": [
      {
        "fieldId": "field-urgency",
        "fieldSettings": {
          "fieldId": "field-urgency",
          "fieldType": "radioGroup",
          "fieldLabel": "Urgency",
          "fieldName": "urgency",
          "fieldSize": "medium",
          "isRequired": true,
          "direction": "horizontal",
          "options": [
            { "label": "Low", "value": "low" },
            { "label": "High", "value": "high" }
          ]
        }
      },
      {
        "fieldId": "field-history",
        "fieldSettings": {
          "fieldId": "field-history",
          "fieldType": "table",
          "fieldLabel": "Previous tickets",
          "fieldName": "previous_tickets",
          "fieldSize": "full",
          "isRequired": false,
          "columns": [
            { "header": "Ticket" },
            { "header": "Opened" },
            { "header": "Status" }
          ]
        }
      }
    ]
  }
]
"##
}
