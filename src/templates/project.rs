//! Project convention templates for `warhorse create`.
//!
//! A convention is a directory layout plus a set of starter files. The
//! `warhorse.toml` it writes only declares what differs from the built-in
//! defaults.

use crate::scaffold::ScaffoldAnswers;

/// Project layouts `create` knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convention {
    /// Static site: pages, scripts, stylesheets and images
    Web,
    /// Script library published to npm
    Library,
}

impl Convention {
    /// Parse convention name from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "web" => Some(Self::Web),
            "library" | "lib" => Some(Self::Library),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Library => "library",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Web => "Static site with pages, scripts, stylesheets and images",
            Self::Library => "Script library with tests and API docs",
        }
    }

    /// Directories created relative to the project root.
    pub fn directories(&self) -> &'static [&'static str] {
        match self {
            Self::Web => &["src/js", "src/less", "src/img", "test"],
            Self::Library => &["src/js", "test"],
        }
    }

    /// Starter files as `(relative path, contents)` pairs, excluding
    /// `warhorse.toml`.
    pub fn starter_files(&self, answers: &ScaffoldAnswers) -> Vec<(&'static str, String)> {
        let mut files = vec![
            (".gitignore", generate_gitignore()),
            (".jshintrc", generate_jshintrc()),
            ("package.json", generate_package_json(self, answers)),
            ("test/index.test.js", generate_test(answers)),
        ];
        match self {
            Self::Web => {
                files.push(("src/index.html", generate_index_html(answers)));
                files.push(("src/js/index.js", generate_web_script()));
                files.push(("src/less/main.less", generate_stylesheet()));
            }
            Self::Library => {
                files.push(("src/js/index.js", generate_library_script(answers)));
            }
        }
        files
    }
}

/// Render the `warhorse.toml` for a new project.
pub fn generate_config(convention: Convention, answers: &ScaffoldAnswers) -> String {
    let mut config = format!(
        r#"# {description}
# Settings here are merged over the built-in defaults.

[project]
name = "{name}"
version = "{version}"
"#,
        description = answers.description,
        name = answers.name,
        version = answers.version,
    );

    if convention == Convention::Library {
        config.push_str(
            r#"
[[pipelines.build.js]]
id = "bundle:js"
src = ["src/js", "index.js"]
dst = ["build", ".js"]

[[pipelines.build.js]]
id = "document:js"
src = ["src/js", "**/*.js"]
dst = ["docs", ""]

[[pipelines.distribute.js]]
id = "minify:js"
src = ["build", "*.js"]
dst = ["dist", ".min.js"]
"#,
        );
    }

    config
}

fn generate_gitignore() -> String {
    r#"node_modules/
build/
dist/
docs/
"#
    .to_string()
}

fn generate_jshintrc() -> String {
    r#"{
  "esversion": 6,
  "undef": true,
  "unused": true,
  "browser": true,
  "node": true,
  "mocha": true
}
"#
    .to_string()
}

fn generate_package_json(convention: &Convention, answers: &ScaffoldAnswers) -> String {
    let mut dev_dependencies = vec![
        ("browserify", "^17.0.0"),
        ("jscs", "^3.0.7"),
        ("jsdoc", "^4.0.2"),
        ("jshint", "^2.13.6"),
        ("jshint-json", "^1.0.0"),
        ("mocha", "^10.2.0"),
        ("uglify-js", "^3.17.4"),
    ];
    if *convention == Convention::Web {
        dev_dependencies.extend([
            ("autoprefixer", "^10.4.16"),
            ("clean-css-cli", "^5.6.3"),
            ("gzip-cli", "^1.2.0"),
            ("html-minifier", "^4.0.0"),
            ("imagemin-cli", "^7.0.0"),
            ("less", "^4.2.0"),
            ("postcss-cli", "^10.1.0"),
        ]);
        dev_dependencies.sort();
    }

    let package = serde_json::json!({
        "name": answers.name,
        "version": answers.version,
        "description": answers.description,
        "author": answers.author,
        "main": "build/index.js",
        "scripts": {
            "build": "warhorse build",
            "test": "warhorse test",
        },
        "devDependencies": dev_dependencies
            .into_iter()
            .map(|(name, version)| (name.to_string(), serde_json::Value::from(version)))
            .collect::<serde_json::Map<_, _>>(),
    });

    // json! never produces an unserialisable value
    let mut rendered = serde_json::to_string_pretty(&package).unwrap_or_default();
    rendered.push('\n');
    rendered
}

fn generate_test(answers: &ScaffoldAnswers) -> String {
    format!(
        r#"var assert = require('assert');

describe('{name}', function () {{
  it('loads', function () {{
    assert.ok(require('../src/js/index.js'));
  }});
}});
"#,
        name = answers.name
    )
}

fn generate_index_html(answers: &ScaffoldAnswers) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{name}</title>
  <link rel="stylesheet" href="css/main.css">
</head>
<body>
  <h1>{name}</h1>
  <script src="js/index.js"></script>
</body>
</html>
"#,
        name = answers.name
    )
}

fn generate_web_script() -> String {
    r#"'use strict';

module.exports = function start() {
  document.body.classList.add('ready');
};
"#
    .to_string()
}

fn generate_library_script(answers: &ScaffoldAnswers) -> String {
    format!(
        r#"'use strict';

/**
 * {description}
 * @module {name}
 */
module.exports = {{}};
"#,
        description = answers.description,
        name = answers.name
    )
}

fn generate_stylesheet() -> String {
    r#"@text: #222;

body {
  color: @text;
  font-family: sans-serif;
}
"#
    .to_string()
}
