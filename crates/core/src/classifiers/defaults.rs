use super::ClassifierDefinition;

/// Read bound for text artifacts (headers, hint files) whose evidence sits
/// near the start of the file.
pub const SMALL_FILE_READ_LIMIT: u64 = 64 * 1024;

const GO_VERSION_EVIDENCE: &str =
    r"(?m)go(?P<version>[0-9]+\.[0-9]+(\.[0-9]+|beta[0-9]+|alpha[0-9]+|rc[0-9]+)?)";

/// The built-in runtime fingerprints, in evaluation order.
pub fn default_definitions() -> Vec<ClassifierDefinition> {
    vec![
        // The interpreter's major.minor is taken from the file name and the
        // full version must then appear in the binary with the same prefix.
        ClassifierDefinition::new("python-binary")
            .file_pattern(r"(?:^|/)python(?P<version>[0-9]+\.[0-9]+)$")
            .file_pattern(r"(?:^|/)libpython(?P<version>[0-9]+\.[0-9]+)\.so.*$")
            .evidence_pattern(r"(?m)(?P<version>{{version}}\.[0-9]+[-_a-zA-Z0-9]*)"),
        ClassifierDefinition::new("cpython-source")
            .file_pattern(r"(?:^|/)patchlevel\.h$")
            .evidence_pattern(r#"(?m)#define\s+PY_VERSION\s+"?(?P<version>[0-9\.\-_a-zA-Z]+)"?"#)
            .read_limit(SMALL_FILE_READ_LIMIT),
        ClassifierDefinition::new("go-binary")
            .file_pattern(r"(?:^|/)go$")
            .evidence_pattern(GO_VERSION_EVIDENCE),
        // Go distributions ship a plain VERSION file next to the toolchain.
        ClassifierDefinition::new("go-binary-hint")
            .file_pattern(r"(?:^|/)VERSION$")
            .evidence_pattern(GO_VERSION_EVIDENCE)
            .read_limit(SMALL_FILE_READ_LIMIT),
        ClassifierDefinition::new("busybox-binary")
            .file_pattern(r"(?:^|/)busybox$")
            .evidence_pattern(r"(?m)BusyBox\s+v(?P<version>[0-9]+\.[0-9]+\.[0-9]+)"),
        ClassifierDefinition::new("nodejs-binary")
            .file_pattern(r"(?:^|/)node$")
            .evidence_pattern(r"(?m)node\.js/v(?P<version>[0-9]+\.[0-9]+\.[0-9]+)"),
        ClassifierDefinition::new("ruby-binary")
            .file_pattern(r"(?:^|/)ruby$")
            .file_pattern(r"(?:^|/)libruby\.so(\.[0-9]+)*$")
            .evidence_pattern(
                r"(?m)ruby (?P<version>[0-9]+\.[0-9]+\.[0-9]+((p|preview|rc|dev)[0-9]*)?) \(",
            ),
        ClassifierDefinition::new("php-cli-binary")
            .file_pattern(r"(?:^|/)php[0-9.]*$")
            .evidence_pattern(
                r"(?m)X-Powered-By: PHP/(?P<version>[0-9]+\.[0-9]+\.[0-9]+(beta[0-9]+|alpha[0-9]+|RC[0-9]+)?)",
            ),
        ClassifierDefinition::new("perl-binary")
            .file_pattern(r"(?:^|/)perl(5[0-9.]*)?$")
            .evidence_pattern(r"(?m)/lib/perl[0-9]/(?P<version>[0-9]+\.[0-9]+\.[0-9]+)"),
        // Release and full build version sit in adjacent NUL-terminated strings.
        ClassifierDefinition::new("java-binary-openjdk")
            .file_pattern(r"(?:^|/)java$")
            .evidence_pattern(
                r"(?m)\x00openjdk\x00java\x00(?P<release>[0-9]+[.0-9]*)\x00(?P<version>[0-9]+[^\x00]+)\x00",
            ),
        ClassifierDefinition::new("haproxy-binary")
            .file_pattern(r"(?:^|/)haproxy$")
            .evidence_pattern(
                r"(?m)HA-Proxy version (?P<version>[0-9]+\.[0-9]+(\.[0-9]+)?(-dev[0-9]+)?)",
            ),
        ClassifierDefinition::new("nginx-binary")
            .file_pattern(r"(?:^|/)nginx$")
            .evidence_pattern(r"(?m)nginx version: nginx/(?P<version>[0-9]+\.[0-9]+\.[0-9]+)"),
        ClassifierDefinition::new("postgresql-binary")
            .file_pattern(r"(?:^|/)postgres$")
            .evidence_pattern(r"(?m)\(PostgreSQL\) (?P<version>[0-9]+\.[0-9]+(\.[0-9]+)?)"),
        ClassifierDefinition::new("memcached-binary")
            .file_pattern(r"(?:^|/)memcached$")
            .evidence_pattern(r"(?m)memcached (?P<version>[0-9]+\.[0-9]+\.[0-9]+)"),
    ]
}
