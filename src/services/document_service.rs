// src/services/document_service.rs

use genpdf::{elements, style, Element};
use image::Luma;
use qrcode::QrCode;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, status_machine::StatusMachine},
    db::{BillingRepository, TenantRepository},
    models::billing::InvoiceStatus,
};

#[derive(Clone)]
pub struct DocumentService {
    billing_repo: BillingRepository,
    tenant_repo: TenantRepository,
}

impl DocumentService {
    pub fn new(billing_repo: BillingRepository, tenant_repo: TenantRepository) -> Self {
        Self {
            billing_repo,
            tenant_repo,
        }
    }

    /// Renderiza o PDF da fatura. Artefato derivado, somente leitura:
    /// nenhum estado muda aqui.
    pub async fn generate_invoice_pdf(
        &self,
        pool: &PgPool,
        invoice_id: Uuid,
    ) -> Result<Vec<u8>, AppError> {
        // 1. Busca os dados
        let invoice = self
            .billing_repo
            .get_invoice(pool, invoice_id)
            .await?
            .ok_or(AppError::NotFound("Fatura"))?;
        let items = self.billing_repo.list_items(pool, invoice_id).await?;
        let tenant = self
            .tenant_repo
            .get_tenant(pool, invoice.tenant_id)
            .await?
            .ok_or(AppError::NotFound("Cliente"))?;

        // 2. Configura o PDF
        // Carrega a fonte da pasta 'fonts/'
        let font_family = genpdf::fonts::from_files("./fonts", "Roboto", None)
            .map_err(|_| AppError::FontNotFound("Fonte não encontrada na pasta ./fonts".to_string()))?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(format!("Fatura {}", invoice.id));
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        doc.push(
            elements::Paragraph::new("SELF STORAGE")
                .styled(style::Style::new().bold().with_font_size(18)),
        );
        doc.push(elements::Break::new(1.5));

        doc.push(
            elements::Paragraph::new(format!("FATURA {}", invoice.id))
                .styled(style::Style::new().bold().with_font_size(14)),
        );
        doc.push(elements::Paragraph::new(format!(
            "Emissão: {}   Vencimento: {}",
            invoice.issue_date.format("%d/%m/%Y"),
            invoice.due_date.format("%d/%m/%Y")
        )));
        doc.push(elements::Paragraph::new(format!(
            "Cliente: {} {} ({})",
            tenant.first_name, tenant.last_name, tenant.document
        )));

        // Fatura cancelada sai com o motivo estampado
        if invoice.status == InvoiceStatus::Void {
            if let Some(reason) = &invoice.void_reason {
                doc.push(elements::Break::new(1));
                doc.push(
                    elements::Paragraph::new(format!("CANCELADA: {}", reason))
                        .styled(style::Style::new().bold().with_font_size(12)),
                );
            }
        }

        doc.push(elements::Break::new(2));

        // --- TABELA DE ITENS ---
        // Pesos das colunas: Descrição (4), Qtd (1), Unitário (2), Total (2)
        let mut table = elements::TableLayout::new(vec![4, 1, 2, 2]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let style_bold = style::Style::new().bold();
        table
            .row()
            .element(elements::Paragraph::new("Descrição").styled(style_bold))
            .element(elements::Paragraph::new("Qtd").styled(style_bold))
            .element(elements::Paragraph::new("Unitário").styled(style_bold))
            .element(elements::Paragraph::new("Total").styled(style_bold))
            .push()
            .map_err(|e| AppError::DocumentError(e.to_string()))?;

        for item in &items {
            table
                .row()
                .element(elements::Paragraph::new(item.description.clone()))
                .element(elements::Paragraph::new(format!("{}", item.quantity)))
                .element(elements::Paragraph::new(format!("R$ {:.2}", item.unit_price)))
                .element(elements::Paragraph::new(format!("R$ {:.2}", item.total())))
                .push()
                .map_err(|e| AppError::DocumentError(e.to_string()))?;
        }

        doc.push(table);
        doc.push(elements::Break::new(2));

        // --- TOTAL ---
        let mut total_paragraph =
            elements::Paragraph::new(format!("TOTAL GERAL: R$ {:.2}", invoice.total_amount));
        total_paragraph.set_alignment(genpdf::Alignment::Right);
        doc.push(total_paragraph.styled(style::Style::new().bold().with_font_size(12)));

        doc.push(elements::Break::new(2));

        // --- ÁREA DE PAGAMENTO (QR CODE) ---
        // QR simples com a referência da fatura; o "Pix Copia e Cola" oficial
        // (EMV BR Code) exigiria uma lib de payload Pix.
        if !invoice.status.is_terminal() {
            doc.push(
                elements::Paragraph::new("PAGAMENTO")
                    .styled(style::Style::new().bold().with_font_size(12)),
            );
            doc.push(elements::Break::new(1));

            let payload = format!("FATURA|{}|{}", invoice.id, invoice.total_amount);
            let code = QrCode::new(payload.as_bytes())
                .map_err(|e| AppError::DocumentError(e.to_string()))?;

            let image_buffer = code.render::<Luma<u8>>().build();
            let dynamic_image = image::DynamicImage::ImageLuma8(image_buffer);

            let pdf_image = genpdf::elements::Image::from_dynamic_image(dynamic_image)
                .map_err(|e| AppError::DocumentError(e.to_string()))?
                .with_scale(genpdf::Scale::new(0.5, 0.5));

            doc.push(pdf_image);
        }

        // 3. Renderiza para buffer (memória)
        let mut buffer = Vec::new();
        doc.render(&mut buffer)
            .map_err(|e| AppError::DocumentError(e.to_string()))?;

        Ok(buffer)
    }
}
