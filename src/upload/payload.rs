/// Multipart body description
///
/// The endpoint files every capture under the same demo study, so everything
/// except `title`/`name` is hard-coded. The form is described as plain data
/// here and only turned into a wire body by the transport, which keeps the
/// contract assertable without an HTTP stack.

/// Field name the binary part is sent under.
pub const FILE_FIELD: &str = "file";

/// Clinical/study metadata attached to every upload.
const STUDY_FIELDS: [(&str, &str); 10] = [
    ("jhove_ClinicalTrialProtocolID", "DemoPhotography"),
    ("jhove_ClinicalTrialProtocolName", "DemoPhotography"),
    ("jhove_ClinicalTrialSiteID", "9999"),
    ("jhove_ClinicalTrialSubjectID", "99991234"),
    ("jhove_PatientID", "99991234"),
    ("jhove_ClinicalTrialTimePointID", "V1"),
    ("jhove_ClinicalTrialTimePointDescription", "Baseline"),
    ("jhove_StudyDate", "20190101"),
    ("jhove_Modality", "XC"),
    ("jhove_ImportType", "NonDicom"),
];

/// The binary part of the form.
pub struct FilePart {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

/// A complete upload body: one file part plus the fixed metadata fields.
pub struct UploadForm {
    pub file: FilePart,
    pub fields: Vec<(&'static str, String)>,
}

/// Build the multipart description for one photo.
pub fn build_form(bytes: Vec<u8>, file_name: &str) -> UploadForm {
    let mut fields: Vec<(&'static str, String)> = vec![
        ("title", file_name.to_string()),
        ("name", file_name.to_string()),
        ("description", "Camera App Upload".to_string()),
        ("author", "rsvuser".to_string()),
        ("destination", "9999/99991234/Baseline/XC".to_string()),
        ("mimetype", "image/jpeg".to_string()),
        (
            "nodeid",
            "workspace://SpacesStore/a90022f6-1ee7-4d1d-ad85-98f6439eb17c".to_string(),
        ),
    ];

    for (key, value) in STUDY_FIELDS {
        fields.push((key, value.to_string()));
    }

    UploadForm {
        file: FilePart {
            file_name: file_name.to_string(),
            mime: "image/jpeg",
            bytes,
        },
        fields,
    }
}
