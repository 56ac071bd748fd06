//! The classification prompt shared by both backends.
//!
//! Instructions, category definitions, and four worked examples (two spam,
//! two not spam) are fixed at compile time; only the email text varies.

const PLACEHOLDER: &str = "{email}";

pub const PROMPT_TEMPLATE: &str = r#"You are part of a system and your task is to determine if a given email is spam or not.
Your output must be a valid JSON object following the format below. As part of a system, your answer must be restricted to the JSON alone, nothing more. It must start and end with the JSON object's braces.

Return a valid JSON object with the format:
{
    "is_spam": boolean flag of the classification, true for spam and false for not spam
    "reason": report in this field how you reason step by step and why you classified the email as spam or not
}

As a classifier, take into consideration the following definitions:
- Spam: any unwanted message sent in bulk to people who never asked for it, typically with the goal of selling something, promoting a scam, or spreading malicious links.
- Not spam: any email the recipient actually wants to receive. It is the legitimate communication they expect, like updates from colleagues, shipping notifications, or newsletters they subscribed to.

Examples of spam e-mails:
1 - PESQUISA MARCA XAROPE
Este é um questionário de pesquisa e sua participação é importante. Responda abaixo. Agradecemos sua participação!
Você já comprou ou pensa em comprar um xarope para tosse ou produto similar?
Marque apenas uma opção abaixo: Já comprei recentemente / Já comprei, mas faz tempo / Nunca comprei, mas penso em comprar / Nunca comprei e não pretendo comprar
Response: {"is_spam": true, "reason": "The email is a survey asking about purchasing a cough syrup or similar product, which indicates it is likely sent in bulk to individuals who did not request it. This aligns with the definition of spam as it aims to gather information for marketing purposes without prior consent from the recipients."}
2 - Dear Marcos,
We're thrilled to announce the launch of a new course: Retrieval Augmented Generation (RAG). This hands-on course shows you how to build production-ready RAG systems, connecting language models to external data sources to improve accuracy, reduce hallucinations, and support real-world use cases. You'll combine retrievers and LLMs, evaluate system performance, and prep your pipeline for deployment. RAG is now at the core of many production-grade AI systems. Enroll now!
Keep learning,
The Course Team
Response: {"is_spam": true, "reason": "The email promotes a new course and encourages enrollment. It appears to be a marketing message aimed at selling a course, which fits the definition of spam as it is unsolicited and sent in bulk to promote a service."}

Examples of not spam e-mails:
1 - Hi Mary,
Correct, there was a mistake. I will send you a new email with a form, so you can fill that one out. Please ignore the previous one.
Let me know if you have any questions.
Best,
Valentina
Response: {"is_spam": false, "reason": "The email is a direct communication between colleagues discussing a mistake and providing instructions for a new email. It does not promote a product, service, or scam, and is expected correspondence, which classifies it as not spam."}
2 - Olá, Junior.
Poxa, sentimos muito por essa experiência com a nossa plataforma.
Analisamos a sua solicitação e o processo de cancelamento do seu pedido já foi iniciado, tá bom?
O cancelamento será realizado assim que o produto retornar ao nosso centro de distribuição e passar por uma análise.
Número da coleta: 237757876. O compromisso para a primeira tentativa de coleta é até o dia 19/01/2024.
Após o recebimento do produto, o estorno acontecerá em até 5 dias úteis no cartão de crédito, 2 dias úteis em pontos ou 4 dias úteis no pix.
Ainda tem dúvidas? Responda esse e-mail que continuaremos com a nossa conversa.
Conte com a gente.
Itaú Shop
Response: {"is_spam": false, "reason": "The email is a legitimate communication regarding the cancellation process of an order. It provides specific details about the cancellation, steps to return the product, and payment information. This type of email is expected by the recipient and is not unsolicited or promotional in nature."}

Email to classify: {email}"#;

/// Substitute the email text into the template. The text goes in verbatim;
/// prompt-injection hardening is out of scope here.
pub fn render(email: &str) -> String {
    PROMPT_TEMPLATE.replace(PLACEHOLDER, email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_has_exactly_one_placeholder() {
        assert_eq!(PROMPT_TEMPLATE.matches(PLACEHOLDER).count(), 1);
    }

    #[test]
    fn render_substitutes_email_text() {
        let rendered = render("Win a free prize now, click this link!");
        assert!(rendered.ends_with("Email to classify: Win a free prize now, click this link!"));
        assert!(!rendered.contains(PLACEHOLDER));
    }

    #[test]
    fn render_accepts_empty_input() {
        let rendered = render("");
        assert!(rendered.ends_with("Email to classify: "));
    }

    #[test]
    fn template_carries_two_examples_per_category() {
        let spam_examples = PROMPT_TEMPLATE.matches(r#""is_spam": true"#).count();
        let ham_examples = PROMPT_TEMPLATE.matches(r#""is_spam": false"#).count();
        assert_eq!(spam_examples, 2);
        assert_eq!(ham_examples, 2);
    }
}
