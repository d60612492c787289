/// Source samples for the built-in languages
pub mod code_samples {
    pub const C_HELLO: &str = r#"#include <stdio.h>

int main(void) {
    puts("Hello from C!");
    return 0;
}
"#;
    pub const CPP_HELLO: &str = r#"#include <iostream>

int main() {
    std::cout << "Hello from C++!" << std::endl;
    return 0;
}
"#;
    pub const PYTHON_HELLO: &str = "print('x')";
    pub const PYTHON_BROKEN: &str = "def f(:\n    pass\n";
    pub const SHELL_HELLO: &str = "echo 'Hello from sh!'\n";
    pub const SHELL_BROKEN: &str = "if then fi\n";

    /// A trivially small program per built-in language
    pub fn hello(language: crate::Language) -> &'static str {
        use crate::Language;
        match language {
            Language::GnuC => C_HELLO,
            Language::GnuCpp => CPP_HELLO,
            Language::Java => {
                "public class Main { public static void main(String[] a) { System.out.println(\"Hello from Java!\"); } }"
            }
            Language::Go => "package main\nimport \"fmt\"\nfunc main() { fmt.Println(\"Hello from Go!\") }\n",
            Language::NodeJs => "console.log('Hello from JavaScript!');\n",
            Language::Php => "<?php echo \"Hello from PHP!\\n\"; ?>",
            Language::Ruby => "puts 'Hello from Ruby!'\n",
            Language::Python2 => "print 'Hello from Python 2!'\n",
            Language::Python3 => PYTHON_HELLO,
            Language::Rust => "fn main() { println!(\"Hello from Rust!\"); }\n",
        }
    }
}

/// Stderr captured from real toolchains and interpreters
pub mod stderr_samples {
    pub const PYTHON_SYNTAX_ERROR: &str =
        "  File \"x.py\", line 2\n    def f(:\nSyntaxError: invalid syntax";
    pub const PYTHON_RUNTIME_ERROR: &str = "Traceback (most recent call last):\n  File \"x.py\", line 1, in <module>\n    1 / 0\nZeroDivisionError: division by zero";
    pub const PYTHON_MISSING_MODULE: &str = "Traceback (most recent call last):\n  File \"x.py\", line 1, in <module>\n    from numpy import array\nImportError: cannot import name 'array'";
}
