use std::path::Path;

/// Find the first extension in `supported` that `filepath` ends with.
///
/// Extensions include their leading dot and may span several parts, e.g.
/// `.vcf.gz`. Matching is on the full file name, so `calls.vcf.gz` matches
/// `.vcf.gz` but not `.vcf`.
pub fn match_extension<'a, P: AsRef<Path>>(filepath: P, supported: &[&'a str]) -> Option<&'a str> {
    let name = filepath
        .as_ref()
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("");

    supported.iter().copied().find(|ext| name.ends_with(ext))
}

#[cfg(test)]
mod tests {
    use super::match_extension;

    const VCF_EXTENSIONS: [&str; 3] = [".vcf", ".vcf.gz", ".bcf"];

    #[test]
    fn test_match_extension() {
        assert_eq!(
            match_extension("data/calls.vcf", &VCF_EXTENSIONS),
            Some(".vcf")
        );
        assert_eq!(
            match_extension("data/calls.vcf.gz", &VCF_EXTENSIONS),
            Some(".vcf.gz")
        );
        assert_eq!(match_extension("calls.bcf", &VCF_EXTENSIONS), Some(".bcf"));
        assert_eq!(match_extension("calls.vcf.bgz", &VCF_EXTENSIONS), None);
        assert_eq!(match_extension("data/", &VCF_EXTENSIONS), None);
    }
}
