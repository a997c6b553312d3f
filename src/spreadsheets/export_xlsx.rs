use super::EXPORT_HEADERS;
use crate::domain::insights::property_ppsf;
use crate::domain::PropertyView;
use crate::errors::ServerError;
use rust_xlsxwriter::{Format, Workbook};

/// Build the Data Studio workbook; numeric columns are written as numbers.
pub fn export_properties_xlsx(properties: &[PropertyView]) -> Result<Vec<u8>, ServerError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Properties")?;

    let bold = Format::new().set_bold();
    let money = Format::new().set_num_format("$#,##0");

    for (col, header) in EXPORT_HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &bold)?;
    }

    for (i, p) in properties.iter().enumerate() {
        let r = (i + 1) as u32;

        worksheet.write_string(r, 0, &p.address)?;
        worksheet.write_number(r, 1, p.bedrooms)?;
        worksheet.write_number(r, 2, p.bathrooms)?;
        worksheet.write_number(r, 3, p.square_footage)?;
        worksheet.write_string(r, 4, &p.layout_type)?;
        worksheet.write_number_with_format(r, 5, p.price(), &money)?;
        if let Some(ppsf) = property_ppsf(p) {
            worksheet.write_number_with_format(r, 6, ppsf, &money)?;
        }
        worksheet.write_string(r, 7, p.status.label())?;
        let created = p
            .created_at
            .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        worksheet.write_string(r, 8, &created)?;
    }

    worksheet.set_column_width(0, 40)?;
    Ok(workbook.save_to_buffer()?)
}
